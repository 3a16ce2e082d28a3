//! Kernel error type

use thiserror::Error;

/// Errors raised while reading kernel value types from text
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Not a plain non-negative decimal, or blank
    #[error("Invalid submission version: {0:?}")]
    InvalidVersion(String),

    #[error("Invalid submission id: {0:?}")]
    InvalidSubmissionId(String),
}
