//! Wizard DTOs

use serde::{Deserialize, Serialize};

use core_kernel::ResumeToken;
use domain_submission::{
    Application, Coverage, CoverageType, Finance, RejectionDraft, WizardController, WizardStep,
};

/// How to open the wizard; an empty body starts a blank draft
///
/// At most one source is used, in this order: `resume_token`,
/// `submission_id`, `application`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StartWizardRequest {
    /// Resume a checkpointed draft
    pub resume_token: Option<ResumeToken>,
    /// Open an upstream submission
    pub submission_id: Option<String>,
    /// Revision to open; the latest when absent
    pub version: Option<String>,
    /// Edit an application already in hand, such as a listing row
    pub application: Option<Application>,
}

#[derive(Debug, Deserialize)]
pub struct FinancialsRequest {
    pub financials: Finance,
    pub coverage: Vec<Coverage>,
}

#[derive(Debug, Deserialize)]
pub struct CoverageSelectionRequest {
    pub types: Vec<CoverageType>,
}

/// Which button advanced the wizard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    #[default]
    Continue,
    /// The financial step's submit button
    Submit,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct NextRequest {
    pub action: NextAction,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RejectRequest {
    pub reason: String,
}

impl From<RejectRequest> for RejectionDraft {
    fn from(request: RejectRequest) -> Self {
        RejectionDraft::new(request.reason)
    }
}

#[derive(Debug, Serialize)]
pub struct StepView {
    pub key: WizardStep,
    pub label: &'static str,
    pub index: usize,
}

impl From<WizardStep> for StepView {
    fn from(step: WizardStep) -> Self {
        Self {
            key: step,
            label: step.label(),
            index: step.index(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WizardResponse {
    pub resume_token: ResumeToken,
    pub step: StepView,
    pub steps: Vec<StepView>,
    pub can_go_back: bool,
    pub locked: bool,
    pub application: Application,
}

impl From<&WizardController> for WizardResponse {
    fn from(wizard: &WizardController) -> Self {
        let step = wizard.step();
        Self {
            resume_token: wizard.token(),
            step: step.into(),
            steps: WizardStep::ALL.into_iter().map(StepView::from).collect(),
            can_go_back: !step.is_first(),
            locked: wizard.is_locked(),
            application: wizard.application().clone(),
        }
    }
}
