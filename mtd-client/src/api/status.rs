//! Classification of the status envelope embedded in every response.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Outcome reported by the server in the `status.code` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiStatus {
    /// 200: the request completed and the payload is usable.
    Success,
    /// 202: the dataset has not changed since the supplied changeset.
    /// Only meaningful while revalidating a cached document.
    NotModified,
    /// 400: a parameter was invalid.
    InvalidParameter,
    /// 401: the API key is invalid.
    InvalidApiKey,
    /// 403: the hourly request limit for the key has been reached.
    RateLimited,
    /// 404: the requested method does not exist.
    UnknownMethod,
    /// 500: the server encountered an error.
    ServerError,
    /// Any other code, or no readable envelope at all.
    Unrecognized(i64),
}

impl ApiStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            200 => ApiStatus::Success,
            202 => ApiStatus::NotModified,
            400 => ApiStatus::InvalidParameter,
            401 => ApiStatus::InvalidApiKey,
            403 => ApiStatus::RateLimited,
            404 => ApiStatus::UnknownMethod,
            500 => ApiStatus::ServerError,
            other => ApiStatus::Unrecognized(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            ApiStatus::Success => 200,
            ApiStatus::NotModified => 202,
            ApiStatus::InvalidParameter => 400,
            ApiStatus::InvalidApiKey => 401,
            ApiStatus::RateLimited => 403,
            ApiStatus::UnknownMethod => 404,
            ApiStatus::ServerError => 500,
            ApiStatus::Unrecognized(code) => *code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ApiStatus::Success)
    }

    pub fn is_not_modified(&self) -> bool {
        matches!(self, ApiStatus::NotModified)
    }

    /// Human-readable meaning of the code.
    pub fn description(&self) -> &'static str {
        match self {
            ApiStatus::Success => "the request was completed successfully",
            ApiStatus::NotModified => "the dataset has not been modified",
            ApiStatus::InvalidParameter => "a parameter was invalid",
            ApiStatus::InvalidApiKey => "the API key provided is invalid",
            ApiStatus::RateLimited => "the hourly request limit on the key has been reached",
            ApiStatus::UnknownMethod => "the requested method does not exist",
            ApiStatus::ServerError => "the server encountered an error",
            ApiStatus::Unrecognized(_) => "cannot process status",
        }
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The `status` object of a response document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusEnvelope {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
}

impl StatusEnvelope {
    /// Read the envelope from a decoded document.
    ///
    /// A missing or malformed envelope reads as code 0, which classifies
    /// as [`ApiStatus::Unrecognized`].
    pub fn of(document: &Value) -> Self {
        document
            .get("status")
            .and_then(|s| StatusEnvelope::deserialize(s).ok())
            .unwrap_or_default()
    }

    pub fn status(&self) -> ApiStatus {
        ApiStatus::from_code(self.code)
    }
}
