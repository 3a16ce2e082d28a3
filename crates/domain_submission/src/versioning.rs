//! Submission id and version assignment

use tracing::debug;

use core_kernel::{SubmissionId, SubmissionVersion};

use crate::application::{Application, SubmissionReference};
use crate::error::SubmissionError;

/// Returns a copy of `application` with its submission reference assigned
///
/// - No id yet: a fresh `LYD…` id and version `1.0`.
/// - Id present, `increment_version` set: same id, version + 1.0.
/// - Id present, flag clear: reference unchanged. A missing version on an
///   existing id is filled in with `1.0`.
///
/// # Errors
///
/// `SubmissionError::Core` when the version must be incremented but is not a
/// plain decimal string.
pub fn generate_updated_application(
    application: &Application,
    increment_version: bool,
) -> Result<Application, SubmissionError> {
    let reference = match (application.id(), application.version()) {
        (Some(id), Some(version)) => {
            let version = if increment_version {
                version.increment()?
            } else {
                version.clone()
            };
            SubmissionReference::new(id.clone(), version)
        }
        (Some(id), None) => SubmissionReference::new(id.clone(), SubmissionVersion::initial()),
        (None, _) => SubmissionReference::new(SubmissionId::generate(), SubmissionVersion::initial()),
    };

    debug!(
        submission_id = ?reference.id,
        version = ?reference.version,
        increment_version,
        "Assigned submission reference"
    );

    Ok(Application {
        submission_reference: reference,
        ..application.clone()
    })
}
