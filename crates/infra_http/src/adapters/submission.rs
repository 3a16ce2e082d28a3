//! REST Submissions Adapter
//!
//! Implements `SubmissionPort` against the upstream endpoints:
//!
//! | operation | request |
//! |-----------|---------|
//! | list | `GET /submissions/{version}?collection_name=&carrier=` |
//! | fetch | `GET /submissions/{id}/{version}?carrier=` |
//! | save | `POST /submissions` |
//! | submit | `POST /submissions/assessment` |
//! | decide | `PUT` or `POST /submissions/{id}/assessment` |

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, instrument};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, SubmissionId};
use domain_session::AuthToken;
use domain_submission::{
    Application, AssessmentOutcome, SubmissionFilter, SubmissionPort, SubmissionReview,
    VersionSelector,
};

use crate::client::ApiClient;
use crate::wire::{ListEnvelope, OutcomeFields};

/// Submissions port acting on behalf of one upstream token
#[derive(Debug, Clone)]
pub struct HttpSubmissionAdapter {
    client: ApiClient,
    token: AuthToken,
}

impl HttpSubmissionAdapter {
    pub fn new(client: ApiClient, token: AuthToken) -> Self {
        Self { client, token }
    }

    async fn list<T: serde::de::DeserializeOwned>(
        &self,
        collection: &str,
        filter: &SubmissionFilter,
    ) -> Result<Vec<T>, PortError> {
        let path = format!("/submissions/{}", filter.version);
        let request = self
            .client
            .request(Method::GET, &path, Some(&self.token))
            .query(&[("collection_name", collection), ("carrier", filter.carrier.as_str())]);
        let envelope: ListEnvelope<T> = self.client.execute_json(&path, request).await?;
        let items = envelope.into_items();
        debug!(collection, count = items.len(), "Listed collection");
        Ok(items)
    }
}

impl DomainPort for HttpSubmissionAdapter {}

#[async_trait]
impl HealthCheckable for HttpSubmissionAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        self.client.health_check().await
    }
}

#[async_trait]
impl SubmissionPort for HttpSubmissionAdapter {
    #[instrument(skip(self), fields(carrier = %filter.carrier))]
    async fn list_submissions(&self, filter: &SubmissionFilter) -> Result<Vec<Application>, PortError> {
        let collection = self.client.config().submissions_collection.clone();
        self.list(&collection, filter).await
    }

    #[instrument(skip(self), fields(carrier = %filter.carrier))]
    async fn list_quotes(&self, filter: &SubmissionFilter) -> Result<Vec<SubmissionReview>, PortError> {
        let collection = self.client.config().quotes_collection.clone();
        self.list(&collection, filter).await
    }

    #[instrument(skip(self), fields(submission_id = %id, version = %version))]
    async fn fetch_submission(
        &self,
        id: &SubmissionId,
        carrier: &str,
        version: &VersionSelector,
    ) -> Result<Application, PortError> {
        let path = format!("/submissions/{id}/{version}");
        let request = self
            .client
            .request(Method::GET, &path, Some(&self.token))
            .query(&[("carrier", carrier)]);
        self.client
            .execute_json(&path, request)
            .await
            .map_err(|e| match PortError::from(e) {
                PortError::NotFound { .. } => PortError::not_found("Submission", id),
                other => other,
            })
    }

    #[instrument(skip(self, application), fields(submission_id = ?application.id()))]
    async fn save_submission(&self, application: &Application) -> Result<(), PortError> {
        let path = "/submissions";
        let request = self
            .client
            .request(Method::POST, path, Some(&self.token))
            .json(application);
        self.client.execute(path, request).await?;
        Ok(())
    }

    #[instrument(skip(self, application), fields(submission_id = ?application.id()))]
    async fn submit_for_assessment(
        &self,
        application: &Application,
    ) -> Result<Option<AssessmentOutcome>, PortError> {
        let path = "/submissions/assessment";
        let request = self
            .client
            .request(Method::POST, path, Some(&self.token))
            .json(application);
        let body = self.client.execute(path, request).await?;
        OutcomeFields::parse(&body).map_err(|e| PortError::Transformation {
            message: e.to_string(),
        })
    }

    #[instrument(skip(self, review), fields(submission_id = %id, assessment = %review.assessment))]
    async fn update_assessment(
        &self,
        id: &SubmissionId,
        review: &SubmissionReview,
    ) -> Result<AssessmentOutcome, PortError> {
        let path = format!("/submissions/{id}/assessment");
        let method = self.client.config().assessment_method.as_method();
        let request = self
            .client
            .request(method, &path, Some(&self.token))
            .json(review);
        let body = self.client.execute(&path, request).await?;

        // Backends that answer without the stored fields confirmed what was sent
        let outcome = OutcomeFields::parse(&body)
            .map_err(|e| PortError::Transformation {
                message: e.to_string(),
            })?
            .unwrap_or_else(|| AssessmentOutcome::from(review.clone()));
        Ok(outcome)
    }
}
