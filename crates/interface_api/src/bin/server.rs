//! Submission Desk - API Server Binary
//!
//! This binary starts the dashboard API in front of the upstream
//! submissions backend.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin submission-desk
//!
//! # Run with environment variables
//! API_PORT=8080 API_UPSTREAM_URL=https://submissions.example.com cargo run --bin submission-desk
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 0.0.0.0)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_JWT_SECRET` - Session token signing secret (required in production)
//! * `API_JWT_EXPIRATION_SECS` - Session token expiration in seconds (default: 3600)
//! * `API_UPSTREAM_URL` - Base URL of the submissions backend
//! * `API_UPSTREAM_TIMEOUT_SECS` - Upstream request timeout (default: 30)
//! * `API_AUTH_HEADER` - `api_key` or `bearer` (default: api_key)
//! * `API_ASSESSMENT_METHOD` - `put` or `post` (default: put)
//! * `API_CARRIER` - Carrier to list and fetch (default: Llyod)
//! * `API_DRAFT_TTL_SECS` - Wizard draft lifetime (default: 28800)
//! * `API_SESSION_IDLE_SECS` - Idle session lifetime (default: 28800)
//! * `API_DEFAULT_ASSESSMENT` - Assessment for rows without a quote (default: CREATED)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use infra_http::ApiClient;
use interface_api::{config::ApiConfig, create_router, AppState};

/// How often expired drafts and idle sessions are swept
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal outside local development
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Invalid API_* configuration")?;
    init_tracing(&config.log_level);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.server_addr()))?;
    let client = ApiClient::new(config.upstream()).context("Failed to build upstream client")?;

    tracing::info!(
        %addr,
        upstream = %config.upstream_url,
        carrier = %config.carrier,
        auth_header = ?config.auth_header,
        assessment_method = ?config.assessment_method,
        "Starting submission desk"
    );

    let state = AppState::new(config, Arc::new(client));
    let sweeper = tokio::spawn(sweep(state.clone()));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Submission desk stopped");
    Ok(())
}

/// `RUST_LOG` overrides `API_LOG_LEVEL` when set
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Periodically drops expired wizard drafts and idle sessions
async fn sweep(state: AppState) {
    let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
    loop {
        ticker.tick().await;
        let drafts = state.drafts.purge_expired().await;
        let sessions = state.sessions().purge_idle(state.config.session_idle()).await;
        if drafts > 0 || sessions > 0 {
            tracing::info!(drafts, sessions, "Swept expired state");
        }
    }
}

/// Resolves on Ctrl+C or, on unix, SIGTERM
///
/// A signal that cannot be installed is logged and never fires, so the
/// server keeps running on the other one.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl+C received, draining connections"),
        () = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}
