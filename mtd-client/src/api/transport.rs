//! The network seam between the API client and the outside world.

use std::future::Future;
use std::time::Duration;

use url::Url;

use super::error::ApiError;

/// Performs one HTTP GET and returns the response body text.
///
/// Implementations do not interpret the body; status classification and
/// decoding happen in [`ApiClient`](super::ApiClient).
pub trait Transport: Send + Sync {
    fn get(&self, url: &Url) -> impl Future<Output = Result<String, ApiError>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self { http })
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<String, ApiError> {
        let response = self.http.get(url.clone()).send().await?;

        // The API reports failures in the JSON status envelope, so the body
        // is read whatever the HTTP status is.
        let status = response.status();
        if !status.is_success() {
            tracing::debug!(http_status = status.as_u16(), "non-success HTTP status");
        }

        Ok(response.text().await?)
    }
}
