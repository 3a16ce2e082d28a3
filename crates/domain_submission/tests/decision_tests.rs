//! Decision step against the mock submissions backend

use std::sync::Arc;

use domain_submission::{
    Assessment, DraftStore, InMemoryDraftStore, MockSubmissionPort, PortCall, RejectionDraft,
    SubmissionError, VersionSelector, WizardController, WizardStep,
};
use test_utils::{assert_err_variant, ApplicationBuilder, IdFixtures};

async fn on_decision(port: &MockSubmissionPort, store: Arc<dyn DraftStore>) -> WizardController {
    WizardController::open(
        store,
        port,
        &IdFixtures::submission_id(),
        "Llyod",
        &VersionSelector::Latest,
    )
    .await
    .unwrap()
}

async fn port_with_submitted() -> MockSubmissionPort {
    let submitted = ApplicationBuilder::new().submitted().build();
    MockSubmissionPort::with_data(vec![submitted], vec![]).await
}

#[tokio::test]
async fn test_accept_overwrites_draft_with_server_fields() {
    let port = port_with_submitted().await;
    let store: Arc<dyn DraftStore> = Arc::new(InMemoryDraftStore::default());
    let mut wizard = on_decision(&port, store.clone()).await;
    assert_eq!(wizard.step(), WizardStep::Decision);

    let outcome = wizard.accept(&port).await.unwrap();

    assert_eq!(outcome.assessment, Assessment::Accepted);
    assert_eq!(outcome.explanation, "");
    let app = wizard.application();
    assert_eq!(app.assessment, Some(Assessment::Accepted));
    assert_eq!(app.explanation.as_deref(), Some(""));
    assert!(app.issue_date.is_some());
    assert!(wizard.is_locked());

    let cached = store.get(&wizard.token()).await.unwrap();
    assert_eq!(&cached.application, app);
}

#[tokio::test]
async fn test_reject_requires_reason() {
    let port = port_with_submitted().await;
    let mut wizard = on_decision(&port, Arc::new(InMemoryDraftStore::default())).await;
    let calls = port.calls().await.len();

    let result = wizard.confirm_reject(&port, &RejectionDraft::new("  ")).await;

    assert_err_variant!(result, SubmissionError::ReasonRequired);
    assert_eq!(port.calls().await.len(), calls);
    assert_eq!(wizard.application().assessment, Some(Assessment::Created));
}

#[tokio::test]
async fn test_reject_sends_trimmed_reason() {
    let port = port_with_submitted().await;
    let mut wizard = on_decision(&port, Arc::new(InMemoryDraftStore::default())).await;

    wizard
        .confirm_reject(&port, &RejectionDraft::new(" Revenue below appetite "))
        .await
        .unwrap();

    let last = port.calls().await.pop().unwrap();
    assert_eq!(
        last,
        PortCall::UpdateAssessment {
            id: IdFixtures::submission_id(),
            assessment: Assessment::Rejected,
            explanation: "Revenue below appetite".to_string(),
        }
    );
    assert_eq!(wizard.application().explanation.as_deref(), Some("Revenue below appetite"));
}

#[tokio::test]
async fn test_failed_decision_leaves_state_unchanged() {
    let port = port_with_submitted().await;
    let mut wizard = on_decision(&port, Arc::new(InMemoryDraftStore::default())).await;
    let before = wizard.snapshot();
    port.fail_with("timeout").await;

    assert_err_variant!(wizard.accept(&port).await, SubmissionError::Persistence(_));
    assert_eq!(wizard.snapshot(), before);
}

#[tokio::test]
async fn test_decided_submission_cannot_be_decided_again() {
    let port = port_with_submitted().await;
    let mut wizard = on_decision(&port, Arc::new(InMemoryDraftStore::default())).await;
    wizard.accept(&port).await.unwrap();

    assert_err_variant!(
        wizard.confirm_reject(&port, &RejectionDraft::new("changed my mind")).await,
        SubmissionError::Locked(_)
    );
}

#[tokio::test]
async fn test_refresh_pulls_latest_assessment() {
    let port = port_with_submitted().await;
    let mut wizard = on_decision(&port, Arc::new(InMemoryDraftStore::default())).await;

    // Another reviewer approves the submission in the meantime
    let review = domain_submission::SubmissionReview::new(
        wizard.application().submission_reference.clone(),
        Assessment::Approved,
        "Within appetite",
    );
    domain_submission::SubmissionPort::update_assessment(&port, &IdFixtures::submission_id(), &review)
        .await
        .unwrap();

    wizard.refresh_decision(&port).await.unwrap();

    assert_eq!(wizard.application().assessment, Some(Assessment::Approved));
    assert_eq!(wizard.application().explanation.as_deref(), Some("Within appetite"));
}

#[tokio::test]
async fn test_decisions_need_the_decision_step() {
    let port = MockSubmissionPort::new();
    let mut wizard = WizardController::start(Arc::new(InMemoryDraftStore::default())).await;

    assert_err_variant!(
        wizard.accept(&port).await,
        SubmissionError::WrongStep { expected: WizardStep::Decision, .. }
    );
}
