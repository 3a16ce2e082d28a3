//! Upstream client and its configuration

use chrono::Utc;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use core_kernel::{AdapterHealth, HealthCheckResult, HealthCheckable};
use domain_session::AuthToken;

use crate::adapters::{HttpAuthAdapter, HttpSubmissionAdapter};
use crate::error::HttpClientError;
use crate::wire::upstream_message;

/// How the upstream token is attached to requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthHeaderScheme {
    /// `X-API-Key: <token>`
    #[default]
    ApiKey,
    /// `Authorization: Bearer <token>`
    Bearer,
}

/// HTTP verb used to record a reviewer's decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentMethod {
    #[default]
    Put,
    Post,
}

impl AssessmentMethod {
    pub fn as_method(&self) -> Method {
        match self {
            AssessmentMethod::Put => Method::PUT,
            AssessmentMethod::Post => Method::POST,
        }
    }
}

/// Upstream connection settings
///
/// # Example
///
/// ```rust
/// use infra_http::{AuthHeaderScheme, HttpClientConfig};
/// use std::time::Duration;
///
/// let config = HttpClientConfig::new("https://api.example.com/")
///     .timeout(Duration::from_secs(10))
///     .auth_scheme(AuthHeaderScheme::Bearer);
/// assert_eq!(config.base_url, "https://api.example.com");
/// ```
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL without a trailing slash
    pub base_url: String,
    pub timeout: Duration,
    pub auth_scheme: AuthHeaderScheme,
    pub assessment_method: AssessmentMethod,
    /// Upstream collection holding submissions
    pub submissions_collection: String,
    /// Upstream collection holding assessment records
    pub quotes_collection: String,
    pub user_agent: String,
}

impl HttpClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(30),
            auth_scheme: AuthHeaderScheme::default(),
            assessment_method: AssessmentMethod::default(),
            submissions_collection: "submissions".to_string(),
            quotes_collection: "quotes".to_string(),
            user_agent: concat!("submission-desk/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn auth_scheme(mut self, scheme: AuthHeaderScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    pub fn assessment_method(mut self, method: AssessmentMethod) -> Self {
        self.assessment_method = method;
        self
    }

    pub fn collections(mut self, submissions: impl Into<String>, quotes: impl Into<String>) -> Self {
        self.submissions_collection = submissions.into();
        self.quotes_collection = quotes.into();
        self
    }
}

/// Shared client for the upstream backend
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<HttpClientConfig>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, HttpClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(HttpClientError::Build)?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Submissions port acting as the holder of `token`
    pub fn submissions(&self, token: AuthToken) -> HttpSubmissionAdapter {
        HttpSubmissionAdapter::new(self.clone(), token)
    }

    /// Auth port for logging users in
    pub fn auth(&self) -> HttpAuthAdapter {
        HttpAuthAdapter::new(self.clone())
    }

    pub(crate) fn request(&self, method: Method, path: &str, token: Option<&AuthToken>) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        let builder = self.http.request(method, url);
        match (token, self.config.auth_scheme) {
            (Some(token), AuthHeaderScheme::ApiKey) => builder.header("X-API-Key", token.expose()),
            (Some(token), AuthHeaderScheme::Bearer) => builder.bearer_auth(token.expose()),
            (None, _) => builder,
        }
    }

    /// Sends the request and returns the body of a successful response
    pub(crate) async fn execute(&self, path: &str, builder: RequestBuilder) -> Result<String, HttpClientError> {
        let start = Instant::now();
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                HttpClientError::Timeout {
                    path: path.to_string(),
                    after: self.config.timeout,
                }
            } else {
                HttpClientError::Request(e)
            }
        })?;

        let status = response.status();
        let body = response.text().await?;
        debug!(
            path,
            status = status.as_u16(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Upstream responded"
        );

        if !status.is_success() {
            return Err(HttpClientError::Status {
                status: status.as_u16(),
                path: path.to_string(),
                message: upstream_message(&body, status.canonical_reason()),
            });
        }
        Ok(body)
    }

    pub(crate) async fn execute_json<R: DeserializeOwned>(
        &self,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<R, HttpClientError> {
        let body = self.execute(path, builder).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait::async_trait]
impl HealthCheckable for ApiClient {
    /// Any HTTP answer from the base URL counts as reachable
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result = self.http.get(&self.config.base_url).send().await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(response) if response.status().is_server_error() => (
                AdapterHealth::Degraded,
                Some(format!("Upstream answered {}", response.status())),
            ),
            Ok(_) => (AdapterHealth::Healthy, None),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Upstream unreachable: {e}"))),
        };

        HealthCheckResult {
            target: "http-submissions-upstream".to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}
