//! Error types for the CloudConvert client
//!
//! Three kinds come out of an HTTP exchange: the request never got a response
//! ([`CloudConvertError::Transport`]), the service answered with a status other
//! than 200 ([`CloudConvertError::Service`]), or a body that looked like JSON
//! could not be parsed ([`CloudConvertError::Decode`]). The remaining variants
//! cover local work around the exchange (files, configuration, typed decoding).

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by [`CloudConvertClient`](crate::CloudConvertClient)
#[derive(Error, Debug)]
pub enum CloudConvertError {
    /// Connection, DNS, timeout or body read failure before a usable response
    #[error("HTTP request to '{url}' failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a status other than 200
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A successful body was bracket-shaped but not valid JSON
    #[error("Response body looks like JSON but cannot be decoded: {body}")]
    Decode {
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// A JSON response did not have the shape the operation expects
    #[error("Unexpected response, expected {expected}")]
    UnexpectedResponse {
        expected: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Local file operation failed
    #[error("File operation failed on '{path}' while {operation}")]
    FileSystem {
        path: PathBuf,
        operation: FileOperation,
        #[source]
        source: std::io::Error,
    },

    /// Invalid client configuration or request construction
    #[error("Invalid configuration: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
        suggestion: Option<String>,
    },
}

/// Failure reported by the service through a non-200 status
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// JSON error body carrying `error` and `code`
    #[error("{message} (code {code})")]
    Api { message: String, code: String },

    /// Any other error body, kept verbatim
    #[error("CloudConvert returned HTTP {status}: '{body}'")]
    Http { status: u16, body: String },
}

/// Types of file operations for error context
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    Read,
    Write,
    Create,
}

impl std::fmt::Display for FileOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOperation::Read => write!(f, "reading"),
            FileOperation::Write => write!(f, "writing"),
            FileOperation::Create => write!(f, "creating"),
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudConvertError>;

impl CloudConvertError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            CloudConvertError::Transport { .. } => "transport",
            CloudConvertError::Service(ServiceError::Api { .. }) => "service_api",
            CloudConvertError::Service(ServiceError::Http { .. }) => "service_http",
            CloudConvertError::Decode { .. } => "decode",
            CloudConvertError::UnexpectedResponse { .. } => "unexpected_response",
            CloudConvertError::FileSystem { .. } => "file_system",
            CloudConvertError::Configuration { .. } => "configuration",
        }
    }

    /// HTTP status of a raw service error
    ///
    /// Structured `{error, code}` bodies carry the service's own code instead,
    /// so only [`ServiceError::Http`] reports a status here.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CloudConvertError::Service(ServiceError::Http { status, .. }) => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn file_system(
        path: impl Into<PathBuf>,
        operation: FileOperation,
        source: std::io::Error,
    ) -> Self {
        CloudConvertError::FileSystem {
            path: path.into(),
            operation,
            source,
        }
    }
}
