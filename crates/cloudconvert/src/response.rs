//! Response classification
//!
//! The service answers with JSON for job metadata and with the converted file
//! itself for inline conversions, without a reliable content type. The body
//! shape decides: bracket-shaped bodies must parse as JSON, anything else is
//! handed back untouched.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{CloudConvertError, Result, ServiceError};

/// Decoded outcome of a successful request
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// JSON object or array
    Json(Value),
    /// Body that is not JSON-shaped, byte for byte as received
    Raw(Vec<u8>),
    /// Empty body
    Empty,
}

impl ApiResponse {
    pub fn is_empty(&self) -> bool {
        matches!(self, ApiResponse::Empty)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Raw payload bytes, if the body was not JSON
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            ApiResponse::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Raw payload as text, if the body was not JSON and is valid UTF-8
    pub fn as_text(&self) -> Option<&str> {
        self.as_bytes().and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Deserialize a JSON response into a typed value
    pub fn deserialize<T: DeserializeOwned>(self, expected: &'static str) -> Result<T> {
        let value = match self {
            ApiResponse::Json(value) => value,
            ApiResponse::Empty => Value::Null,
            ApiResponse::Raw(bytes) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        };
        serde_json::from_value(value)
            .map_err(|source| CloudConvertError::UnexpectedResponse { expected, source })
    }
}

/// Whether a trimmed body looks like a JSON object or array
pub fn is_json_shaped(trimmed: &[u8]) -> bool {
    matches!(
        (trimmed.first(), trimmed.last()),
        (Some(b'{'), Some(b'}')) | (Some(b'['), Some(b']'))
    )
}

/// Classify a response from its status code and body
///
/// Only status 200 counts as success.
pub fn classify(status: u16, body: Vec<u8>) -> Result<ApiResponse> {
    if status != 200 {
        return Err(service_error(status, &body).into());
    }

    if body.is_empty() {
        return Ok(ApiResponse::Empty);
    }

    let trimmed = body.trim_ascii();
    if is_json_shaped(trimmed) {
        return serde_json::from_slice(trimmed)
            .map(ApiResponse::Json)
            .map_err(|source| CloudConvertError::Decode {
                body: String::from_utf8_lossy(trimmed).into_owned(),
                source,
            });
    }

    Ok(ApiResponse::Raw(body))
}

/// Build the error for a non-200 response
///
/// A JSON object with `error` and `code` becomes [`ServiceError::Api`];
/// anything else is kept verbatim with its status.
pub fn service_error(status: u16, body: &[u8]) -> ServiceError {
    if let Ok(Value::Object(map)) = serde_json::from_slice::<Value>(body) {
        if let (Some(error), Some(code)) = (map.get("error"), map.get("code")) {
            return ServiceError::Api {
                message: json_scalar_text(error),
                code: json_scalar_text(code),
            };
        }
    }

    ServiceError::Http {
        status,
        body: String::from_utf8_lossy(body).into_owned(),
    }
}

fn json_scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
