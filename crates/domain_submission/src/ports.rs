//! Submission Domain Ports
//!
//! The `SubmissionPort` trait is everything the submission domain needs from
//! the upstream submissions backend. The production adapter lives in
//! `infra_http`; tests use the in-memory adapter from `test_utils`.
//!
//! ```rust,ignore
//! let port: Arc<dyn SubmissionPort> = Arc::new(client.submissions(token));
//! wizard.next(port.as_ref()).await?;
//! ```

use async_trait::async_trait;
use std::fmt;

use core_kernel::{DomainPort, PortError, SubmissionId, SubmissionVersion};

use crate::application::{Application, DEFAULT_CARRIER};
use crate::assessment::{AssessmentOutcome, SubmissionReview};

/// Which revision of a submission to read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionSelector {
    /// The most recent revision
    #[default]
    Latest,
    /// A specific revision
    Exact(SubmissionVersion),
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Latest => f.write_str("latest"),
            VersionSelector::Exact(version) => write!(f, "{version}"),
        }
    }
}

impl From<Option<SubmissionVersion>> for VersionSelector {
    fn from(version: Option<SubmissionVersion>) -> Self {
        version.map_or(VersionSelector::Latest, VersionSelector::Exact)
    }
}

/// Filter for collection listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFilter {
    pub carrier: String,
    pub version: VersionSelector,
}

impl Default for SubmissionFilter {
    fn default() -> Self {
        Self {
            carrier: DEFAULT_CARRIER.to_string(),
            version: VersionSelector::Latest,
        }
    }
}

impl SubmissionFilter {
    /// Latest revisions filed with `carrier`
    pub fn for_carrier(carrier: impl Into<String>) -> Self {
        Self {
            carrier: carrier.into(),
            ..Default::default()
        }
    }
}

/// Port to the upstream submissions backend
#[async_trait]
pub trait SubmissionPort: DomainPort {
    /// Lists submissions in the `submissions` collection
    async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Application>, PortError>;

    /// Lists assessment records in the `quotes` collection
    async fn list_quotes(&self, filter: &SubmissionFilter) -> Result<Vec<SubmissionReview>, PortError>;

    /// Fetches one submission revision
    async fn fetch_submission(
        &self,
        id: &SubmissionId,
        carrier: &str,
        version: &VersionSelector,
    ) -> Result<Application, PortError>;

    /// Saves a draft without requesting an assessment
    async fn save_submission(&self, application: &Application) -> Result<(), PortError>;

    /// Creates a revision and requests an assessment
    ///
    /// Backends that assess synchronously return the outcome; otherwise `None`.
    async fn submit_for_assessment(
        &self,
        application: &Application,
    ) -> Result<Option<AssessmentOutcome>, PortError>;

    /// Records a reviewer's decision
    async fn update_assessment(
        &self,
        id: &SubmissionId,
        review: &SubmissionReview,
    ) -> Result<AssessmentOutcome, PortError>;
}

/// In-memory submission backend for tests
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use chrono::Utc;
    use core_kernel::{AdapterHealth, HealthCheckResult, HealthCheckable};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    use crate::assessment::Assessment;

    /// A call received by [`MockSubmissionPort`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum PortCall {
        ListSubmissions,
        ListQuotes,
        Fetch {
            id: SubmissionId,
            version: String,
        },
        Save {
            id: Option<SubmissionId>,
            version: Option<SubmissionVersion>,
        },
        Submit {
            id: Option<SubmissionId>,
            version: Option<SubmissionVersion>,
        },
        UpdateAssessment {
            id: SubmissionId,
            assessment: Assessment,
            explanation: String,
        },
    }

    /// Mock backend keeping every saved revision in memory
    ///
    /// `fail_with` makes every following call answer with an upstream error
    /// until `recover` is called.
    #[derive(Debug, Default, Clone)]
    pub struct MockSubmissionPort {
        revisions: Arc<RwLock<Vec<Application>>>,
        quotes: Arc<RwLock<Vec<SubmissionReview>>>,
        calls: Arc<RwLock<Vec<PortCall>>>,
        failure: Arc<RwLock<Option<String>>>,
        assess_as: Arc<RwLock<Option<Assessment>>>,
    }

    impl MockSubmissionPort {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates both collections
        pub async fn with_data(submissions: Vec<Application>, quotes: Vec<SubmissionReview>) -> Self {
            let port = Self::new();
            *port.revisions.write().await = submissions;
            *port.quotes.write().await = quotes;
            port
        }

        /// Fails every call with a 503 carrying `message`
        pub async fn fail_with(&self, message: impl Into<String>) {
            *self.failure.write().await = Some(message.into());
        }

        /// Stops failing calls
        pub async fn recover(&self) {
            *self.failure.write().await = None;
        }

        /// Makes `submit_for_assessment` answer synchronously with `assessment`
        pub async fn assess_submissions_as(&self, assessment: Assessment) {
            *self.assess_as.write().await = Some(assessment);
        }

        /// Calls received so far, in order
        pub async fn calls(&self) -> Vec<PortCall> {
            self.calls.read().await.clone()
        }

        /// Every stored revision, in write order
        pub async fn revisions(&self) -> Vec<Application> {
            self.revisions.read().await.clone()
        }

        /// Every stored quote, in write order
        pub async fn quotes(&self) -> Vec<SubmissionReview> {
            self.quotes.read().await.clone()
        }

        async fn record(&self, call: PortCall) -> Result<(), PortError> {
            self.calls.write().await.push(call);
            match self.failure.read().await.as_ref() {
                Some(message) => Err(PortError::Upstream {
                    status: 503,
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }

        async fn store(&self, application: &Application) {
            let mut revisions = self.revisions.write().await;
            let existing = revisions.iter_mut().find(|stored| {
                stored.id().is_some()
                    && stored.id() == application.id()
                    && stored.version() == application.version()
            });
            match existing {
                Some(stored) => *stored = application.clone(),
                None => revisions.push(application.clone()),
            }
        }
    }

    impl DomainPort for MockSubmissionPort {}

    #[async_trait]
    impl HealthCheckable for MockSubmissionPort {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                target: "mock-submission-port".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("Mock adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl SubmissionPort for MockSubmissionPort {
        async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Application>, PortError> {
            self.record(PortCall::ListSubmissions).await?;
            let revisions = self.revisions.read().await;

            // Latest revision per id; id-less drafts are listed as stored
            let mut listed: Vec<Application> = Vec::new();
            for revision in revisions.iter().filter(|a| a.carrier == filter.carrier) {
                let previous = revision
                    .id()
                    .and_then(|id| listed.iter().position(|a| a.id() == Some(id)));
                match previous {
                    Some(index) => listed[index] = revision.clone(),
                    None => listed.push(revision.clone()),
                }
            }
            Ok(listed)
        }

        async fn list_quotes(&self, _filter: &SubmissionFilter) -> Result<Vec<SubmissionReview>, PortError> {
            self.record(PortCall::ListQuotes).await?;
            Ok(self.quotes.read().await.clone())
        }

        async fn fetch_submission(
            &self,
            id: &SubmissionId,
            carrier: &str,
            version: &VersionSelector,
        ) -> Result<Application, PortError> {
            self.record(PortCall::Fetch {
                id: id.clone(),
                version: version.to_string(),
            })
            .await?;
            let revisions = self.revisions.read().await;
            revisions
                .iter()
                .rev()
                .filter(|a| a.id() == Some(id) && a.carrier == carrier)
                .find(|a| match version {
                    VersionSelector::Latest => true,
                    VersionSelector::Exact(v) => a.version() == Some(v),
                })
                .cloned()
                .ok_or_else(|| PortError::not_found("Submission", id))
        }

        async fn save_submission(&self, application: &Application) -> Result<(), PortError> {
            self.record(PortCall::Save {
                id: application.id().cloned(),
                version: application.version().cloned(),
            })
            .await?;
            self.store(application).await;
            Ok(())
        }

        async fn submit_for_assessment(
            &self,
            application: &Application,
        ) -> Result<Option<AssessmentOutcome>, PortError> {
            self.record(PortCall::Submit {
                id: application.id().cloned(),
                version: application.version().cloned(),
            })
            .await?;

            let mut stored = application.clone();
            let outcome = self.assess_as.read().await.clone().map(|assessment| AssessmentOutcome {
                assessment,
                explanation: String::new(),
                issue_date: Some(Utc::now()),
            });
            match &outcome {
                Some(outcome) => {
                    stored.apply_outcome(outcome);
                    self.quotes.write().await.push(SubmissionReview {
                        submission_reference: stored.submission_reference.clone(),
                        assessment: outcome.assessment.clone(),
                        explanation: outcome.explanation.clone(),
                        issue_date: outcome.issue_date,
                    });
                }
                None => stored.assessment = Some(Assessment::Created),
            }
            self.store(&stored).await;
            Ok(outcome)
        }

        async fn update_assessment(
            &self,
            id: &SubmissionId,
            review: &SubmissionReview,
        ) -> Result<AssessmentOutcome, PortError> {
            self.record(PortCall::UpdateAssessment {
                id: id.clone(),
                assessment: review.assessment.clone(),
                explanation: review.explanation.clone(),
            })
            .await?;

            let outcome = AssessmentOutcome::from(review.clone());
            {
                let mut revisions = self.revisions.write().await;
                let latest = revisions.iter_mut().rev().find(|a| a.id() == Some(id));
                match latest {
                    Some(application) => application.apply_outcome(&outcome),
                    None => return Err(PortError::not_found("Submission", id)),
                }
            }
            self.quotes.write().await.push(review.clone());
            Ok(outcome)
        }
    }
}
