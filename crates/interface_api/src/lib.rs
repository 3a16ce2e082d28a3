//! Dashboard HTTP API
//!
//! This crate provides the REST API the submission dashboard runs against,
//! using Axum. It owns the per-user state the browser used to keep: the
//! session, display preferences and the open wizard draft.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for auth, preferences, the wizard and the listing
//! - **Middleware**: Session authentication, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//! - **State**: Upstream ports, session store, draft store
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let client = ApiClient::new(config.upstream())?;
//! let app = create_router(AppState::new(config, Arc::new(client)));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;
pub mod state;

use axum::{
    Router,
    routing::{get, post, put},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use crate::middleware::{auth_middleware, audit_middleware};
use crate::handlers::{activity, auth as auth_handlers, health, preferences, wizard};

pub use crate::state::{AppState, UpstreamPorts};

/// Creates the main API router
///
/// # Arguments
///
/// * `state` - Shared state with the upstream ports and stores
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let public_auth_routes = Router::new()
        .route("/login", post(auth_handlers::login))
        .route("/forgot-password", post(auth_handlers::forgot_password));

    // Session routes
    let session_routes = Router::new()
        .route("/logout", post(auth_handlers::logout))
        .route("/me", get(auth_handlers::me));

    // Preference routes
    let preference_routes = Router::new()
        .route("/", get(preferences::get_preferences))
        .route("/theme/toggle", post(preferences::toggle_theme))
        .route("/sidebar/toggle", post(preferences::toggle_sidebar));

    // Wizard routes
    let wizard_routes = Router::new()
        .route(
            "/",
            post(wizard::start_wizard)
                .get(wizard::get_wizard)
                .delete(wizard::discard_wizard),
        )
        .route("/broker", put(wizard::update_broker))
        .route("/insured", put(wizard::update_insured))
        .route("/financials", put(wizard::update_financials))
        .route("/coverages", put(wizard::select_coverages))
        .route("/next", post(wizard::next_step))
        .route("/back", post(wizard::previous_step))
        .route("/save", post(wizard::save))
        .route("/decision/accept", post(wizard::accept))
        .route("/decision/reject", post(wizard::reject))
        .route("/decision/refresh", post(wizard::refresh_decision));

    // Protected API routes
    let api_routes = Router::new()
        .nest("/auth", session_routes)
        .nest("/preferences", preference_routes)
        .nest("/wizard", wizard_routes)
        .route("/activity", get(activity::list_activity))
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1/auth", public_auth_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
