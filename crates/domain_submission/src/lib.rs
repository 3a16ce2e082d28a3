//! Submission Domain
//!
//! This crate models an insurance submission (broker, insured, financials and
//! requested coverage) and the four-step intake wizard that builds it.
//!
//! # Wizard Lifecycle
//!
//! ```text
//! Broker -> Insured -> Financial --submit--> Decision
//!                          |                    |
//!                        save              accept / reject
//!                    (stays put)        (locks the application)
//! ```
//!
//! Persistence goes through the [`ports::SubmissionPort`] trait; the wizard
//! state itself is checkpointed into a [`draft::DraftStore`] after every
//! successful change so a session can resume it while the draft is fresh.

pub mod application;
pub mod coverage;
pub mod assessment;
pub mod versioning;
pub mod validation;
pub mod wizard;
pub mod decision;
pub mod draft;
pub mod ports;
pub mod error;

pub use application::{Application, SubmissionReference, Broker, Insured, Finance, DEFAULT_CARRIER};
pub use coverage::{Coverage, CoverageType, Claims};
pub use assessment::{Assessment, SubmissionReview, AssessmentOutcome};
pub use versioning::generate_updated_application;
pub use validation::{FieldError, StepValidator, ValidationResult};
pub use wizard::{WizardController, WizardSnapshot, WizardStep};
pub use decision::RejectionDraft;
pub use draft::{DraftStore, InMemoryDraftStore};
pub use ports::{SubmissionPort, SubmissionFilter, VersionSelector};
#[cfg(any(test, feature = "mock"))]
pub use ports::mock::{MockSubmissionPort, PortCall};
pub use error::SubmissionError;
