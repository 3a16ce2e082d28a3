//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! submission desk test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built, valid step data
//! - `builders`: Builder patterns for applications, quotes and rows
//! - `assertions`: Custom assertion helpers for domain types
//! - `generators`: Property-based test data generators
//!
//! The mock ports themselves live next to their traits
//! (`domain_submission::MockSubmissionPort`, `domain_session::MockAuthPort`)
//! and are enabled here through the crates' `mock` feature.

pub mod fixtures;
pub mod builders;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use assertions::*;
pub use generators::*;

pub use domain_session::MockAuthPort;
pub use domain_submission::{MockSubmissionPort, PortCall};
