//! Submission intake wizard
//!
//! The controller owns one application draft and the step the user is on.
//! Every successful change is checkpointed into the draft store under the
//! wizard's resume token; failed changes leave both the draft and the step
//! exactly as they were.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use core_kernel::{ResumeToken, SubmissionId};

use crate::application::{Application, Broker, Finance, Insured};
use crate::assessment::Assessment;
use crate::coverage::{Coverage, CoverageType};
use crate::draft::DraftStore;
use crate::error::SubmissionError;
use crate::ports::{SubmissionPort, VersionSelector};
use crate::validation::{StepValidator, ValidationResult};
use crate::versioning::generate_updated_application;

/// Wizard steps, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Broker,
    Insured,
    Financial,
    Decision,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Broker,
        WizardStep::Insured,
        WizardStep::Financial,
        WizardStep::Decision,
    ];

    /// Zero-based position of the step
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Step at a zero-based position
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The following step, if any
    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The preceding step, if any
    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn is_first(&self) -> bool {
        *self == WizardStep::Broker
    }

    pub fn is_last(&self) -> bool {
        *self == WizardStep::Decision
    }

    /// Title shown in the progress indicator
    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::Broker => "Broker",
            WizardStep::Insured => "Insured",
            WizardStep::Financial => "Financial",
            WizardStep::Decision => "Decision",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Serializable state of a wizard, as stored in the draft store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub application: Application,
}

/// Drives one application through the intake steps
pub struct WizardController {
    pub(crate) token: ResumeToken,
    pub(crate) step: WizardStep,
    pub(crate) application: Application,
    pub(crate) drafts: Arc<dyn DraftStore>,
}

impl fmt::Debug for WizardController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("token", &self.token)
            .field("step", &self.step)
            .field("application", &self.application)
            .finish_non_exhaustive()
    }
}

impl WizardController {
    /// Starts a wizard on an empty draft
    pub async fn start(drafts: Arc<dyn DraftStore>) -> Self {
        let wizard = Self {
            token: ResumeToken::new(),
            step: WizardStep::Broker,
            application: Application::new_draft(),
            drafts,
        };
        wizard.checkpoint().await;
        info!(token = %wizard.token, "Started submission wizard");
        wizard
    }

    /// Opens an existing submission for editing or review
    ///
    /// Submissions already sent for assessment open on the decision step.
    pub async fn open(
        drafts: Arc<dyn DraftStore>,
        port: &dyn SubmissionPort,
        id: &SubmissionId,
        carrier: &str,
        version: &VersionSelector,
    ) -> Result<Self, SubmissionError> {
        let application = port.fetch_submission(id, carrier, version).await?;
        let step = if application.is_submitted() {
            WizardStep::Decision
        } else {
            WizardStep::Broker
        };
        let wizard = Self {
            token: ResumeToken::new(),
            step,
            application,
            drafts,
        };
        wizard.checkpoint().await;
        info!(token = %wizard.token, submission_id = %id, %step, "Opened submission");
        Ok(wizard)
    }

    /// Starts a wizard on an application already in hand, such as a
    /// listing row that never received an id
    pub async fn from_application(drafts: Arc<dyn DraftStore>, application: Application) -> Self {
        let step = if application.is_submitted() {
            WizardStep::Decision
        } else {
            WizardStep::Broker
        };
        let wizard = Self {
            token: ResumeToken::new(),
            step,
            application,
            drafts,
        };
        wizard.checkpoint().await;
        info!(token = %wizard.token, %step, "Loaded application into wizard");
        wizard
    }

    /// Resumes a checkpointed wizard
    pub async fn resume(
        drafts: Arc<dyn DraftStore>,
        token: ResumeToken,
    ) -> Result<Self, SubmissionError> {
        let snapshot = drafts
            .get(&token)
            .await
            .ok_or(SubmissionError::DraftNotFound(token))?;
        Ok(Self {
            token,
            step: snapshot.step,
            application: snapshot.application,
            drafts,
        })
    }

    pub fn token(&self) -> ResumeToken {
        self.token
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn application(&self) -> &Application {
        &self.application
    }

    pub fn is_locked(&self) -> bool {
        self.application.is_locked()
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            application: self.application.clone(),
        }
    }

    /// Replaces the broker details
    pub async fn update_broker(&mut self, broker: Broker) -> Result<(), SubmissionError> {
        self.ensure_editing(WizardStep::Broker)?;
        reject_invalid(StepValidator::validate_broker(&broker))?;
        self.application.broker = broker;
        self.checkpoint().await;
        Ok(())
    }

    /// Replaces the insured details
    pub async fn update_insured(&mut self, insured: Insured) -> Result<(), SubmissionError> {
        self.ensure_editing(WizardStep::Insured)?;
        reject_invalid(StepValidator::validate_insured(&insured))?;
        self.application.insured = insured;
        self.checkpoint().await;
        Ok(())
    }

    /// Replaces the financials and the full coverage list
    pub async fn update_financials(
        &mut self,
        financials: Finance,
        coverage: Vec<Coverage>,
    ) -> Result<(), SubmissionError> {
        self.ensure_editing(WizardStep::Financial)?;
        reject_invalid(StepValidator::validate_financials(&financials, &coverage))?;
        self.application.financials = financials;
        self.application.coverage = coverage;
        self.checkpoint().await;
        Ok(())
    }

    /// Changes the coverage selection, applying defaults to new types
    pub async fn select_coverages(&mut self, types: &[CoverageType]) -> Result<(), SubmissionError> {
        self.ensure_editing(WizardStep::Financial)?;
        self.application.select_coverages(types);
        self.checkpoint().await;
        Ok(())
    }

    /// Advances one step
    ///
    /// Leaving the financial step submits the application for assessment
    /// first; a failed submission keeps the wizard where it is. On the last
    /// step this is a no-op.
    pub async fn next(&mut self, port: &dyn SubmissionPort) -> Result<WizardStep, SubmissionError> {
        let Some(next) = self.step.next() else {
            return Ok(self.step);
        };
        reject_invalid(StepValidator::validate_step(self.step, &self.application))?;

        if self.step == WizardStep::Financial && !self.is_locked() {
            self.submit(port).await?;
        }

        self.step = next;
        self.checkpoint().await;
        Ok(self.step)
    }

    /// Steps back; a no-op on the first step
    pub async fn back(&mut self) -> WizardStep {
        if let Some(previous) = self.step.previous() {
            self.step = previous;
            self.checkpoint().await;
        }
        self.step
    }

    /// Persists the draft upstream without advancing or bumping the version
    pub async fn save(&mut self, port: &dyn SubmissionPort) -> Result<(), SubmissionError> {
        self.ensure_unlocked()?;
        let updated = generate_updated_application(&self.application, false)?;

        if let Err(e) = port.save_submission(&updated).await {
            warn!(token = %self.token, error = %e, "Saving submission failed");
            return Err(e.into());
        }

        info!(
            token = %self.token,
            submission_id = ?updated.id(),
            "Saved submission draft"
        );
        self.application = updated;
        self.checkpoint().await;
        Ok(())
    }

    /// Forgets the checkpointed draft
    pub async fn discard(self) {
        self.drafts.remove(&self.token).await;
    }

    async fn submit(&mut self, port: &dyn SubmissionPort) -> Result<(), SubmissionError> {
        // Resubmitting an already assessed revision creates the next version
        let mut updated =
            generate_updated_application(&self.application, self.application.is_submitted())?;

        let outcome = match port.submit_for_assessment(&updated).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(token = %self.token, error = %e, "Submitting for assessment failed");
                return Err(e.into());
            }
        };

        match outcome {
            Some(outcome) => updated.apply_outcome(&outcome),
            None => {
                updated.assessment = Some(Assessment::Created);
                updated.explanation = None;
                updated.issue_date = None;
            }
        }

        info!(
            token = %self.token,
            submission_id = ?updated.id(),
            version = ?updated.version(),
            assessment = ?updated.assessment,
            "Submitted for assessment"
        );
        self.application = updated;
        Ok(())
    }

    pub(crate) async fn checkpoint(&self) {
        self.drafts.put(self.token, self.snapshot()).await;
    }

    pub(crate) fn ensure_unlocked(&self) -> Result<(), SubmissionError> {
        match &self.application.assessment {
            Some(assessment) if assessment.is_terminal() => {
                Err(SubmissionError::Locked(assessment.to_string()))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn ensure_step(&self, expected: WizardStep) -> Result<(), SubmissionError> {
        if self.step != expected {
            return Err(SubmissionError::WrongStep {
                expected,
                actual: self.step,
            });
        }
        Ok(())
    }

    fn ensure_editing(&self, expected: WizardStep) -> Result<(), SubmissionError> {
        self.ensure_unlocked()?;
        self.ensure_step(expected)
    }
}

fn reject_invalid(result: ValidationResult) -> Result<(), SubmissionError> {
    result.into_result().map_err(SubmissionError::Validation)
}
