//! Activity listing errors

use core_kernel::PortError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActivityError {
    #[error("Failed to load activity: {0}")]
    Port(#[from] PortError),

    #[error("Page numbers start at 1, got {0}")]
    InvalidPage(usize),

    #[error("Page size must be positive, got {0}")]
    InvalidPageSize(usize),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Unknown sort direction: {0}")]
    UnknownDirection(String),
}
