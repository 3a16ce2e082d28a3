//! Submission domain errors

use thiserror::Error;

use core_kernel::{CoreError, PortError, ResumeToken};

use crate::validation::FieldError;
use crate::wizard::WizardStep;

/// Errors that can occur in the submission domain
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("Validation failed with {} field error(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("Submission is locked after a final decision ({0})")]
    Locked(String),

    #[error("Operation requires the {expected} step, wizard is on {actual}")]
    WrongStep { expected: WizardStep, actual: WizardStep },

    #[error("Submission has not been submitted for assessment yet")]
    NotSubmitted,

    #[error("A decline reason is required")]
    ReasonRequired,

    #[error("Unknown coverage type: {0}")]
    UnknownCoverage(String),

    #[error("Draft not found or expired: {0}")]
    DraftNotFound(ResumeToken),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Persistence failed: {0}")]
    Persistence(#[from] PortError),
}

impl SubmissionError {
    /// Field errors carried by a validation failure
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            SubmissionError::Validation(errors) => errors,
            _ => &[],
        }
    }
}
