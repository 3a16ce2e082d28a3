//! API middleware

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::{info, warn};

use crate::auth::Claims;
use crate::error::ApiError;
use crate::AppState;

/// Authentication middleware
///
/// Validates the session token and puts the claims and the live
/// `SessionHandle` into request extensions. Tokens whose session has been
/// logged out or purged are refused.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            warn!("Missing or invalid Authorization header");
            ApiError::Unauthorized("Sign in to continue".to_string())
        })?;

    let claims = crate::auth::validate_token(token, &state.config.jwt_secret).map_err(|e| {
        warn!(error = %e, "Token validation failed");
        ApiError::from(e)
    })?;
    let session_id = claims.session_id()?;

    let session = state.sessions().get(&session_id).await.ok_or_else(|| {
        warn!(session_id = %session_id, "Token refers to an ended session");
        ApiError::Unauthorized("Session has ended".to_string())
    })?;

    // A busy session is in use right now; no need to wait for it
    if let Ok(mut active) = session.try_lock() {
        active.touch();
    }

    request.extensions_mut().insert(claims);
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Audit logging middleware
///
/// Logs all API requests with the session that made them
pub async fn audit_middleware(
    State(_state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let (session_id, username) = request
        .extensions()
        .get::<Claims>()
        .map(|c| (c.sub.clone(), c.username.clone()))
        .unwrap_or_else(|| ("anonymous".to_string(), "anonymous".to_string()));

    let start = Utc::now();

    let response = next.run(request).await;

    let duration = Utc::now() - start;
    let status = response.status();

    info!(
        method = %method,
        uri = %uri,
        session = %session_id,
        user = %username,
        status = %status.as_u16(),
        duration_ms = duration.num_milliseconds(),
        "API request"
    );

    response
}
