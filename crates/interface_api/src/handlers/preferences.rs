//! Theme and sidebar handlers

use axum::{Extension, Json};
use tracing::debug;

use domain_session::SessionHandle;

use crate::dto::preferences::*;

pub async fn get_preferences(Extension(session): Extension<SessionHandle>) -> Json<PreferencesResponse> {
    let preferences = session.lock().await.preferences;
    Json(preferences.into())
}

/// Moves to the next theme in the cycle
pub async fn toggle_theme(Extension(session): Extension<SessionHandle>) -> Json<PreferencesResponse> {
    let mut active = session.lock().await;
    let theme = active.preferences.toggle_theme();
    debug!(session_id = %session.id(), %theme, "Theme changed");
    Json(active.preferences.into())
}

/// Flips the sidebar, or forces it when `open` is given
pub async fn toggle_sidebar(
    Extension(session): Extension<SessionHandle>,
    request: Option<Json<SidebarToggleRequest>>,
) -> Json<PreferencesResponse> {
    let forced = request.and_then(|Json(r)| r.open);
    let mut active = session.lock().await;
    active.preferences.toggle_sidebar(forced);
    Json(active.preferences.into())
}
