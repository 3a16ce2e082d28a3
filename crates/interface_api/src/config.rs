//! API configuration

use chrono::TimeDelta;
use serde::Deserialize;
use std::time::Duration;

use domain_submission::{Assessment, SubmissionFilter, DEFAULT_CARRIER};
use infra_http::{AssessmentMethod, AuthHeaderScheme, HttpClientConfig};

/// Longest draft or idle-session lifetime accepted: one week
pub const MAX_LIFETIME_SECS: i64 = 7 * 24 * 60 * 60;

/// API configuration
///
/// Every field can be set from an `API_`-prefixed environment variable,
/// e.g. `API_UPSTREAM_URL` or `API_DRAFT_TTL_SECS`; unset fields keep their
/// defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Secret for signing session tokens
    pub jwt_secret: String,
    /// Session token lifetime in seconds
    pub jwt_expiration_secs: u64,
    /// Base URL of the upstream submissions backend
    pub upstream_url: String,
    pub upstream_timeout_secs: u64,
    /// How the upstream token is sent
    pub auth_header: AuthHeaderScheme,
    /// Verb for recording decisions upstream
    pub assessment_method: AssessmentMethod,
    /// Carrier whose submissions are listed and fetched
    pub carrier: String,
    /// Lifetime of an untouched wizard draft
    pub draft_ttl_secs: i64,
    /// Sessions idle longer than this are dropped
    pub session_idle_secs: i64,
    /// Assessment shown for listing rows no quote covers
    pub default_assessment: String,
    /// Log level
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_secs: 3600,
            upstream_url: "http://localhost:8000".to_string(),
            upstream_timeout_secs: 30,
            auth_header: AuthHeaderScheme::default(),
            assessment_method: AssessmentMethod::default(),
            carrier: DEFAULT_CARRIER.to_string(),
            draft_ttl_secs: domain_submission::draft::DEFAULT_DRAFT_TTL_SECS,
            session_idle_secs: 8 * 60 * 60,
            default_assessment: "CREATED".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    ///
    /// # Errors
    ///
    /// Unparseable values, and lifetimes outside `1..=MAX_LIFETIME_SECS`.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the types alone cannot rule out
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        for (name, secs) in [
            ("draft_ttl_secs", self.draft_ttl_secs),
            ("session_idle_secs", self.session_idle_secs),
        ] {
            if !(1..=MAX_LIFETIME_SECS).contains(&secs) {
                return Err(config::ConfigError::Message(format!(
                    "{name} must be between 1 and {MAX_LIFETIME_SECS}, got {secs}"
                )));
            }
        }
        Ok(())
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings for the upstream client
    pub fn upstream(&self) -> HttpClientConfig {
        HttpClientConfig::new(self.upstream_url.clone())
            .timeout(Duration::from_secs(self.upstream_timeout_secs))
            .auth_scheme(self.auth_header)
            .assessment_method(self.assessment_method)
    }

    /// Listing filter for the configured carrier
    pub fn submission_filter(&self) -> SubmissionFilter {
        SubmissionFilter::for_carrier(self.carrier.clone())
    }

    pub fn default_assessment(&self) -> Assessment {
        Assessment::from(self.default_assessment.clone())
    }

    /// Draft lifetime, clamped to `1..=MAX_LIFETIME_SECS`
    pub fn draft_ttl(&self) -> TimeDelta {
        lifetime(self.draft_ttl_secs)
    }

    /// Idle-session lifetime, clamped like [`ApiConfig::draft_ttl`]
    pub fn session_idle(&self) -> TimeDelta {
        lifetime(self.session_idle_secs)
    }
}

fn lifetime(secs: i64) -> TimeDelta {
    TimeDelta::try_seconds(secs.clamp(1, MAX_LIFETIME_SECS)).unwrap_or(TimeDelta::zero())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");
        assert_eq!(config.carrier, "Llyod");
        assert_eq!(config.default_assessment(), Assessment::Created);
        assert_eq!(config.draft_ttl(), TimeDelta::hours(8));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_out_of_range_lifetimes_are_rejected() {
        for secs in [0, -5, MAX_LIFETIME_SECS + 1, i64::MAX] {
            let config = ApiConfig { draft_ttl_secs: secs, ..Default::default() };
            assert!(config.validate().is_err(), "draft_ttl_secs = {secs}");

            let config = ApiConfig { session_idle_secs: secs, ..Default::default() };
            assert!(config.validate().is_err(), "session_idle_secs = {secs}");
        }
    }

    #[test]
    fn test_lifetimes_are_clamped_instead_of_overflowing() {
        let config = ApiConfig {
            draft_ttl_secs: i64::MAX,
            session_idle_secs: i64::MIN,
            ..Default::default()
        };
        assert_eq!(config.draft_ttl(), TimeDelta::weeks(1));
        assert_eq!(config.session_idle(), TimeDelta::seconds(1));
    }

    #[test]
    fn test_upstream_settings() {
        let config = ApiConfig {
            upstream_url: "https://api.example.com/".into(),
            upstream_timeout_secs: 5,
            auth_header: AuthHeaderScheme::Bearer,
            ..Default::default()
        };
        let upstream = config.upstream();
        assert_eq!(upstream.base_url, "https://api.example.com");
        assert_eq!(upstream.timeout, Duration::from_secs(5));
        assert_eq!(upstream.auth_scheme, AuthHeaderScheme::Bearer);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: ApiConfig = serde_json::from_str(r#"{"port": 9000, "auth_header": "bearer"}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.auth_header, AuthHeaderScheme::Bearer);
        assert_eq!(config.jwt_expiration_secs, 3600);
    }
}
