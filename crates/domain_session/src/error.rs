//! Session domain errors

use core_kernel::{PortError, SessionId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    /// Shown verbatim on the login form
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Session not found: {0}")]
    NotFound(SessionId),

    #[error("Authentication service failed: {0}")]
    Upstream(#[from] PortError),
}
