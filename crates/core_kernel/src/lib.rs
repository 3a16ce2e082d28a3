//! Core Kernel - Foundational types for the submission desk
//!
//! This crate provides the building blocks shared by every domain module:
//! - Strongly-typed identifiers (submission ids, session ids, resume tokens)
//! - The string-encoded submission version and its increment rule
//! - Port error types and marker traits for swappable adapters

pub mod identifiers;
pub mod version;
pub mod ports;
pub mod serde_helpers;
pub mod error;

pub use identifiers::{SubmissionId, SessionId, ResumeToken};
pub use version::SubmissionVersion;
pub use ports::{PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth};
pub use error::CoreError;
