//! Shared application state

use std::sync::Arc;

use core_kernel::{HealthCheckResult, HealthCheckable};
use domain_activity::{ActivityService, MergeOptions};
use domain_session::{AuthPort, AuthService, AuthToken, SessionStore};
use domain_submission::{DraftStore, InMemoryDraftStore, SubmissionPort};
use infra_http::ApiClient;

use crate::config::ApiConfig;

/// Source of upstream ports
///
/// Submission calls act on behalf of the signed-in user, so a port is
/// handed out per upstream token.
pub trait UpstreamPorts: HealthCheckable {
    fn auth(&self) -> Arc<dyn AuthPort>;

    fn submissions(&self, token: &AuthToken) -> Arc<dyn SubmissionPort>;
}

impl UpstreamPorts for ApiClient {
    fn auth(&self) -> Arc<dyn AuthPort> {
        Arc::new(ApiClient::auth(self))
    }

    fn submissions(&self, token: &AuthToken) -> Arc<dyn SubmissionPort> {
        Arc::new(ApiClient::submissions(self, token.clone()))
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub upstream: Arc<dyn UpstreamPorts>,
    pub auth: AuthService,
    pub drafts: Arc<dyn DraftStore>,
    pub activity: ActivityService,
}

impl AppState {
    pub fn new(config: ApiConfig, upstream: Arc<dyn UpstreamPorts>) -> Self {
        let auth = AuthService::new(upstream.auth(), Arc::new(SessionStore::new()));
        let drafts: Arc<dyn DraftStore> = Arc::new(InMemoryDraftStore::new(config.draft_ttl()));
        let activity = ActivityService::new(
            MergeOptions {
                default_assessment: config.default_assessment(),
            },
            config.submission_filter(),
        );

        Self {
            config: Arc::new(config),
            upstream,
            auth,
            drafts,
            activity,
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        self.auth.sessions()
    }

    /// Submissions port acting as the holder of `token`
    pub fn submissions(&self, token: &AuthToken) -> Arc<dyn SubmissionPort> {
        self.upstream.submissions(token)
    }

    pub async fn upstream_health(&self) -> HealthCheckResult {
        self.upstream.health_check().await
    }
}
