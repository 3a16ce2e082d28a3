//! Activity listing handler

use axum::{
    extract::{Query, State},
    Extension, Json,
};

use domain_activity::ActivityQuery;
use domain_session::SessionHandle;

use crate::dto::activity::*;
use crate::{error::ApiError, AppState};

/// Lists submissions merged with their assessments
///
/// Both upstream collections are read fresh on every call.
pub async fn list_activity(
    State(state): State<AppState>,
    Extension(session): Extension<SessionHandle>,
    Query(params): Query<ActivityParams>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let query = ActivityQuery::try_from(params)?;
    let token = session.lock().await.upstream_token.clone();
    let port = state.submissions(&token);

    let page = state.activity.page(port.as_ref(), &query).await?;
    Ok(Json(page.into()))
}
