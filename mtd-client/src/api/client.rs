//! MTD developer API HTTP client.
//!
//! Builds one deterministic URL per request, performs a single GET through
//! the configured [`Transport`], and classifies the response's status
//! envelope. Nothing is retried.

use std::time::Duration;

use tracing::{debug, trace, warn};
use url::Url;

use crate::request::{Command, Params};

use super::document::Document;
use super::error::ApiError;
use super::status::{ApiStatus, StatusEnvelope};
use super::transport::{HttpTransport, Transport};

/// Default base URL for the MTD developer API.
pub const DEFAULT_BASE_URL: &str = "https://developer.cumtd.com/api";

/// Default API version.
pub const DEFAULT_VERSION: &str = "2.1";

/// Response format. Only JSON is supported.
const FORMAT: &str = "json";

/// Configuration for the API client.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Developer API key, sent as the `key` parameter
    pub api_key: String,
    /// Base URL for the API (defaults to the production API)
    pub base_url: String,
    /// API version, without the leading `v`
    pub version: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ApiConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            version: DEFAULT_VERSION.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API version.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// A decoded response together with its classified status.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: ApiStatus,
    pub message: String,
    pub document: Document,
}

impl RawResponse {
    /// The document, if the server reported success.
    pub fn into_success(self) -> Result<Document, ApiError> {
        if self.status.is_success() {
            Ok(self.document)
        } else {
            Err(ApiError::Status {
                status: self.status,
                message: self.message,
            })
        }
    }
}

/// MTD API client.
#[derive(Debug, Clone)]
pub struct ApiClient<T = HttpTransport> {
    transport: T,
    api_key: String,
    base_url: String,
    version: String,
}

impl ApiClient<HttpTransport> {
    /// Create a new client that talks HTTP.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> ApiClient<T> {
    /// Create a client on top of any transport.
    pub fn with_transport(config: ApiConfig, transport: T) -> Self {
        Self {
            transport,
            api_key: config.api_key,
            base_url: config.base_url,
            version: config.version,
        }
    }

    /// The configured API version.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request URL:
    /// `{base}/v{version}/json/{command}?key={key}&{name}={value}...`.
    ///
    /// Parameter values are percent-encoded here and nowhere else.
    pub fn request_url(&self, command: Command, params: &Params) -> Result<Url, ApiError> {
        let path = format!(
            "{}/v{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.version,
            FORMAT,
            command.name()
        );
        for (name, _) in params.iter().filter(|(name, _)| !command.accepts(name)) {
            warn!(%command, param = name, "parameter not in the command table");
        }
        let query = std::iter::once(("key", self.api_key.as_str())).chain(params.iter());
        Ok(Url::parse_with_params(&path, query)?)
    }

    /// Perform one request and classify its status.
    ///
    /// Returns `Err` only when no decodable response was obtained; a decoded
    /// response with a failure status is returned as-is so that callers can
    /// act on codes such as [`ApiStatus::NotModified`].
    pub async fn fetch(&self, command: Command, params: &Params) -> Result<RawResponse, ApiError> {
        let url = self.request_url(command, params)?;
        trace!(%command, params = ?params, "fetching");

        let body = self.transport.get(&url).await?;
        let document = Document::parse(body)?;

        let envelope = StatusEnvelope::of(document.value());
        let status = envelope.status();
        debug!(
            %command,
            code = status.code(),
            msg = %envelope.msg,
            "{}",
            status.description()
        );

        Ok(RawResponse {
            status,
            message: envelope.msg,
            document,
        })
    }

    /// Perform one request and require a success status.
    pub async fn fetch_success(
        &self,
        command: Command,
        params: &Params,
    ) -> Result<Document, ApiError> {
        self.fetch(command, params).await?.into_success()
    }
}
