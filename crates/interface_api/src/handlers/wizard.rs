//! Submission wizard handlers
//!
//! Every mutating handler claims the session with `try_lock` first, so a
//! second action arriving while one is in flight gets a 409 instead of
//! queueing behind it.

use axum::{extract::State, http::StatusCode, Extension, Json};
use tokio::sync::MutexGuard;
use tracing::info;

use core_kernel::{SubmissionId, SubmissionVersion};
use domain_session::{SessionHandle, UserSession};
use domain_submission::{
    Broker, Insured, SubmissionError, VersionSelector, WizardController, WizardStep,
};

use crate::dto::wizard::*;
use crate::{error::ApiError, AppState};

fn claim(session: &SessionHandle) -> Result<MutexGuard<'_, UserSession>, ApiError> {
    session.try_lock().map_err(|_| ApiError::busy())
}

async fn open_wizard(state: &AppState, active: &UserSession) -> Result<WizardController, ApiError> {
    let token = active.wizard.ok_or_else(ApiError::no_wizard)?;
    Ok(WizardController::resume(state.drafts.clone(), token).await?)
}

/// Opens the wizard on a blank draft, an upstream submission, an
/// application in hand, or a checkpointed draft
pub async fn start_wizard(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    request: Option<Json<StartWizardRequest>>,
) -> Result<(StatusCode, Json<WizardResponse>), ApiError> {
    let request = request.map(|Json(r)| r).unwrap_or_default();
    let mut active = claim(&session)?;
    let drafts = state.drafts.clone();

    let wizard = if let Some(token) = request.resume_token {
        WizardController::resume(drafts, token).await?
    } else if let Some(id) = request.submission_id {
        let id: SubmissionId = id.parse()?;
        let version = match request.version {
            Some(version) => VersionSelector::Exact(version.parse::<SubmissionVersion>()?),
            None => VersionSelector::Latest,
        };
        let port = state.submissions(&active.upstream_token);
        WizardController::open(drafts, port.as_ref(), &id, &state.config.carrier, &version).await?
    } else if let Some(application) = request.application {
        WizardController::from_application(drafts, application).await
    } else {
        WizardController::start(drafts).await
    };

    // The session keeps one wizard; a replaced draft is dropped
    if let Some(previous) = active.wizard.replace(wizard.token()) {
        if previous != wizard.token() {
            state.drafts.remove(&previous).await;
        }
    }

    info!(session_id = %session.id(), token = %wizard.token(), step = %wizard.step(), "Wizard opened");
    Ok((StatusCode::CREATED, Json(WizardResponse::from(&wizard))))
}

/// Returns the open wizard
pub async fn get_wizard(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<WizardResponse>, ApiError> {
    let active = claim(&session)?;
    let wizard = open_wizard(&state, &active).await?;
    Ok(Json(WizardResponse::from(&wizard)))
}

/// Closes the wizard and forgets its draft
pub async fn discard_wizard(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<StatusCode, ApiError> {
    let mut active = claim(&session)?;
    let wizard = open_wizard(&state, &active).await?;
    wizard.discard().await;
    active.wizard = None;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_broker(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Json(broker): Json<Broker>,
) -> Result<Json<WizardResponse>, ApiError> {
    let active = claim(&session)?;
    let mut wizard = open_wizard(&state, &active).await?;
    wizard.update_broker(broker).await?;
    Ok(Json(WizardResponse::from(&wizard)))
}

pub async fn update_insured(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Json(insured): Json<Insured>,
) -> Result<Json<WizardResponse>, ApiError> {
    let active = claim(&session)?;
    let mut wizard = open_wizard(&state, &active).await?;
    wizard.update_insured(insured).await?;
    Ok(Json(WizardResponse::from(&wizard)))
}

pub async fn update_financials(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Json(request): Json<FinancialsRequest>,
) -> Result<Json<WizardResponse>, ApiError> {
    let active = claim(&session)?;
    let mut wizard = open_wizard(&state, &active).await?;
    wizard.update_financials(request.financials, request.coverage).await?;
    Ok(Json(WizardResponse::from(&wizard)))
}

/// Changes the coverage selection, adding new types with default terms
pub async fn select_coverages(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Json(request): Json<CoverageSelectionRequest>,
) -> Result<Json<WizardResponse>, ApiError> {
    let active = claim(&session)?;
    let mut wizard = open_wizard(&state, &active).await?;
    wizard.select_coverages(&request.types).await?;
    Ok(Json(WizardResponse::from(&wizard)))
}

/// Advances one step; leaving the financial step submits for assessment
pub async fn next_step(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    request: Option<Json<NextRequest>>,
) -> Result<Json<WizardResponse>, ApiError> {
    let action = request.map(|Json(r)| r.action).unwrap_or_default();
    let active = claim(&session)?;
    let mut wizard = open_wizard(&state, &active).await?;

    if action == NextAction::Submit && wizard.step() != WizardStep::Financial {
        return Err(SubmissionError::WrongStep {
            expected: WizardStep::Financial,
            actual: wizard.step(),
        }
        .into());
    }

    let port = state.submissions(&active.upstream_token);
    wizard.next(port.as_ref()).await?;
    Ok(Json(WizardResponse::from(&wizard)))
}

pub async fn previous_step(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<WizardResponse>, ApiError> {
    let active = claim(&session)?;
    let mut wizard = open_wizard(&state, &active).await?;
    wizard.back().await;
    Ok(Json(WizardResponse::from(&wizard)))
}

/// Saves the draft upstream without advancing
pub async fn save(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<WizardResponse>, ApiError> {
    let active = claim(&session)?;
    let mut wizard = open_wizard(&state, &active).await?;
    let port = state.submissions(&active.upstream_token);
    wizard.save(port.as_ref()).await?;
    Ok(Json(WizardResponse::from(&wizard)))
}

pub async fn accept(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<WizardResponse>, ApiError> {
    let active = claim(&session)?;
    let mut wizard = open_wizard(&state, &active).await?;
    let port = state.submissions(&active.upstream_token);
    wizard.accept(port.as_ref()).await?;
    Ok(Json(WizardResponse::from(&wizard)))
}

/// Rejects with the reason typed into the reject dialog
pub async fn reject(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Json(request): Json<RejectRequest>,
) -> Result<Json<WizardResponse>, ApiError> {
    let active = claim(&session)?;
    let mut wizard = open_wizard(&state, &active).await?;
    let port = state.submissions(&active.upstream_token);
    wizard.confirm_reject(port.as_ref(), &request.into()).await?;
    Ok(Json(WizardResponse::from(&wizard)))
}

/// Pulls the latest assessment from the upstream
pub async fn refresh_decision(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<WizardResponse>, ApiError> {
    let active = claim(&session)?;
    let mut wizard = open_wizard(&state, &active).await?;
    let port = state.submissions(&active.upstream_token);
    wizard.refresh_decision(port.as_ref()).await?;
    Ok(Json(WizardResponse::from(&wizard)))
}
