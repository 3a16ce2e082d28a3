//! HTTP client error types

use std::time::Duration;
use thiserror::Error;

use core_kernel::PortError;

/// Errors raised while talking to the upstream backend
#[derive(Debug, Error)]
pub enum HttpClientError {
    /// The reqwest client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// No response within the configured timeout
    #[error("Request to {path} timed out after {after:?}")]
    Timeout { path: String, after: Duration },

    /// The request never produced a response
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The upstream answered with a non-success status
    #[error("Server returned {status} for {path}: {message}")]
    Status {
        status: u16,
        path: String,
        message: String,
    },

    /// The response body was not the expected JSON
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl HttpClientError {
    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(self, HttpClientError::Request(e) if e.is_connect())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            HttpClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Translates client errors into the port taxonomy
///
/// - 401/403 -> `PortError::Unauthorized`
/// - 404 -> `PortError::NotFound`
/// - 409 -> `PortError::Conflict`
/// - 400/422 -> `PortError::Validation`
/// - other statuses -> `PortError::Upstream`
/// - timeouts -> `PortError::Timeout`
/// - transport failures -> `PortError::Connection`
/// - undecodable bodies -> `PortError::Transformation`
impl From<HttpClientError> for PortError {
    fn from(error: HttpClientError) -> Self {
        match error {
            HttpClientError::Build(e) => PortError::Internal {
                message: "HTTP client unavailable".to_string(),
                source: Some(Box::new(e)),
            },
            HttpClientError::Timeout { path, after } => PortError::Timeout {
                operation: path,
                after_ms: after.as_millis() as u64,
            },
            HttpClientError::Request(e) => PortError::Connection {
                message: e.to_string(),
                source: Some(Box::new(e)),
            },
            HttpClientError::Status { status, path, message } => match status {
                401 | 403 => PortError::Unauthorized { message },
                404 => PortError::NotFound {
                    resource: "Resource".to_string(),
                    id: path,
                },
                409 => PortError::Conflict { message },
                400 | 422 => PortError::Validation { message, field: None },
                _ => PortError::Upstream { status, message },
            },
            HttpClientError::Decode(e) => PortError::Transformation {
                message: e.to_string(),
            },
        }
    }
}
