//! API client error types.

use crate::request::InvalidOption;

use super::status::ApiStatus;

/// Errors from fetching and interpreting API responses.
///
/// Every variant is a "no data" outcome for the caller. Transport and decode
/// failures are grouped by [`ApiError::is_fetch_failure`].
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No response could be obtained from the transport
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The request URL could not be built from the configured base URL
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    /// The response body was not a JSON object
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The server reported a non-success status
    #[error("API error {status}: {message}")]
    Status { status: ApiStatus, message: String },

    /// The response had no usable payload under the expected field
    #[error("response has no usable `{field}` field: {message}")]
    Payload {
        field: &'static str,
        message: String,
    },

    /// An argument was rejected before any request was made
    #[error(transparent)]
    InvalidOption(#[from] InvalidOption),
}

impl ApiError {
    /// True when no decodable response was obtained at all.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            ApiError::Http(_) | ApiError::Transport { .. } | ApiError::Json { .. }
        )
    }

    /// The server-reported status, if this error carries one.
    pub fn status(&self) -> Option<ApiStatus> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
