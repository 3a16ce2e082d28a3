//! Decision step: refresh, accept and reject
//!
//! Decisions are round-trips to the upstream. Nothing is applied locally
//! until the upstream confirms; the confirmed `assessment`, `explanation`
//! and `issue_date` then overwrite the draft and its checkpoint.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::assessment::{Assessment, AssessmentOutcome, SubmissionReview};
use crate::error::SubmissionError;
use crate::ports::{SubmissionPort, VersionSelector};
use crate::wizard::{WizardController, WizardStep};

/// The reject dialog's input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectionDraft {
    pub reason: String,
}

impl RejectionDraft {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    /// Whether the rejection may be confirmed (a non-blank reason is present)
    pub fn can_confirm(&self) -> bool {
        !self.reason.trim().is_empty()
    }

    /// The explanation to send upstream
    pub fn explanation(&self) -> Result<&str, SubmissionError> {
        if self.can_confirm() {
            Ok(self.reason.trim())
        } else {
            Err(SubmissionError::ReasonRequired)
        }
    }
}

impl WizardController {
    /// Re-reads the current assessment from the upstream
    ///
    /// Only `assessment` and `explanation` are taken from the response; the
    /// rest of the draft is left as the user last saw it.
    pub async fn refresh_decision(&mut self, port: &dyn SubmissionPort) -> Result<(), SubmissionError> {
        self.ensure_step(WizardStep::Decision)?;
        let id = self.application.id().cloned().ok_or(SubmissionError::NotSubmitted)?;
        let version = VersionSelector::from(self.application.version().cloned());

        let latest = match port
            .fetch_submission(&id, &self.application.carrier, &version)
            .await
        {
            Ok(latest) => latest,
            Err(e) => {
                warn!(submission_id = %id, error = %e, "Failed to load submission status");
                return Err(e.into());
            }
        };

        self.application.assessment = latest.assessment;
        self.application.explanation = Some(latest.explanation.unwrap_or_default());
        self.checkpoint().await;
        Ok(())
    }

    /// Accepts the submission
    pub async fn accept(&mut self, port: &dyn SubmissionPort) -> Result<AssessmentOutcome, SubmissionError> {
        self.decide(port, Assessment::Accepted, String::new()).await
    }

    /// Rejects the submission with the reason from the reject dialog
    pub async fn confirm_reject(
        &mut self,
        port: &dyn SubmissionPort,
        draft: &RejectionDraft,
    ) -> Result<AssessmentOutcome, SubmissionError> {
        let explanation = draft.explanation()?.to_string();
        self.decide(port, Assessment::Rejected, explanation).await
    }

    async fn decide(
        &mut self,
        port: &dyn SubmissionPort,
        assessment: Assessment,
        explanation: String,
    ) -> Result<AssessmentOutcome, SubmissionError> {
        self.ensure_step(WizardStep::Decision)?;
        self.ensure_unlocked()?;
        let id = self.application.id().cloned().ok_or(SubmissionError::NotSubmitted)?;

        let review = SubmissionReview::new(
            self.application.submission_reference.clone(),
            assessment,
            explanation,
        );

        let outcome = match port.update_assessment(&id, &review).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    submission_id = %id,
                    assessment = %review.assessment,
                    error = %e,
                    "Recording decision failed"
                );
                return Err(e.into());
            }
        };

        info!(
            submission_id = %id,
            assessment = %outcome.assessment,
            "Recorded decision"
        );
        self.application.apply_outcome(&outcome);
        self.checkpoint().await;
        Ok(outcome)
    }
}
