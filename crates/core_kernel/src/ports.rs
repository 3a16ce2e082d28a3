//! Port plumbing shared by the domain crates
//!
//! Each domain crate declares its own port trait (`SubmissionPort`,
//! `AuthPort`) on top of [`DomainPort`] and reports failures as
//! [`PortError`]. The HTTP adapters in `infra_http` implement the traits
//! against the upstream submissions backend; the `mock` feature of each
//! domain crate provides in-memory versions for tests.
//!
//! ```text
//!   interface_api handlers
//!            │
//!            ▼
//!   domain services ──► SubmissionPort / AuthPort
//!                              ▲              ▲
//!                    HttpSubmissionAdapter   Mock*Port
//! ```
//!
//! ```rust,ignore
//! #[async_trait]
//! pub trait SubmissionPort: DomainPort {
//!     async fn save_submission(&self, application: &Application) -> Result<(), PortError>;
//! }
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of a call through a port
///
/// The variants follow what the upstream can tell us: a missing record, a
/// rejected payload, a refused token, a status we have no special meaning
/// for, or no usable answer at all.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    /// The backend refused the payload (400 / 422)
    #[error("Rejected by upstream: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Any other non-success status
    #[error("Upstream returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// The request never got an answer
    #[error("Could not reach upstream: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    #[error("{service} is unavailable")]
    Unavailable { service: String },

    /// The answer arrived but could not be read
    #[error("Unreadable upstream response: {message}")]
    Transformation { message: String },

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    pub fn not_found(resource: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        PortError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PortError::Unauthorized { .. })
    }
}

/// Marker for port traits; adapters are shared across request tasks
pub trait DomainPort: Send + Sync + 'static {}

/// Reachability of something a port talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    /// Reachable, but answering with server errors
    Degraded,
    Unhealthy,
}

/// Outcome of one health probe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    /// What was probed, e.g. `http-submissions-upstream`
    pub target: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}
