//! Login, logout and password reset handlers

use axum::{extract::State, http::StatusCode, Extension, Json};

use domain_session::SessionHandle;

use crate::dto::auth::*;
use crate::{auth::create_token, error::ApiError, AppState};

/// Signs in upstream and issues a session token
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = state.auth.login(request.into()).await?;
    let user = session.lock().await.user.clone();

    let access_token = create_token(
        &session.id(),
        &user.username,
        &state.config.jwt_secret,
        state.config.jwt_expiration_secs,
    )?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.config.jwt_expiration_secs,
        user: user.into(),
    }))
}

/// Accepts a password reset request
///
/// The answer does not reveal whether the address has an account.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    state.auth.forgot_password(request.into()).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "If the address has an account, a reset link is on its way".to_string(),
        }),
    ))
}

/// Ends the session and drops its wizard draft
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> StatusCode {
    let draft = session.lock().await.wizard.take();
    if let Some(token) = draft {
        state.drafts.remove(&token).await;
    }
    state.auth.logout(&session.id()).await;
    StatusCode::NO_CONTENT
}

/// Returns the signed-in user
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.auth.current_user(&session.id()).await?;
    Ok(Json(user.into()))
}
