//! Decoded response documents.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::error::ApiError;

/// Maximum number of body characters kept in a decode error.
const ERROR_BODY_CHARS: usize = 500;

/// A response document: the body text exactly as received, plus its
/// decoded JSON value.
///
/// The body text is what gets written to and read from the disk cache, so a
/// cached document is byte-identical to the response it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    body: String,
    value: Value,
}

impl Document {
    /// Decode a body. Anything other than a JSON object is rejected.
    pub fn parse(body: impl Into<String>) -> Result<Self, ApiError> {
        let body = body.into();
        let value: Value = serde_json::from_str(&body).map_err(|e| ApiError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(ERROR_BODY_CHARS).collect()),
        })?;

        if !value.is_object() {
            return Err(ApiError::Json {
                message: "response is not a JSON object".to_string(),
                body: Some(body.chars().take(ERROR_BODY_CHARS).collect()),
            });
        }

        Ok(Self { body, value })
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.value.get(name)
    }

    /// The change-token this dataset was served with.
    pub fn changeset_id(&self) -> Option<String> {
        self.field("changeset_id").and_then(token_string)
    }

    /// The feed timestamp this dataset was served with.
    pub fn timestamp(&self) -> Option<String> {
        self.field("time").and_then(token_string)
    }

    /// The `new_changeset` flag of a revalidation response.
    pub fn new_changeset(&self) -> Option<bool> {
        self.field("new_changeset").and_then(Value::as_bool)
    }

    /// Deserialize one top-level field into a typed payload.
    pub fn extract<T: DeserializeOwned>(&self, field: &'static str) -> Result<T, ApiError> {
        let value = self.field(field).ok_or_else(|| ApiError::Payload {
            field,
            message: "field missing from response".to_string(),
        })?;
        T::deserialize(value).map_err(|e| ApiError::Payload {
            field,
            message: e.to_string(),
        })
    }
}

/// Render a token-like JSON value as a string.
///
/// Tokens and timestamps are compared as strings; numbers are rendered in
/// their JSON form so `5` and `"5"` compare equal.
pub(crate) fn token_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
