//! Test Data Builders
//!
//! Builder patterns for applications, quotes and listing rows. Tests specify
//! only the fields they care about; everything else is a valid fixture.

use chrono::{DateTime, Utc};

use core_kernel::{SubmissionId, SubmissionVersion};
use domain_activity::ActivityRow;
use domain_submission::{
    Application, Assessment, Broker, Coverage, Finance, Insured, SubmissionReference,
    SubmissionReview, DEFAULT_CARRIER,
};

use crate::fixtures::{FinanceFixtures, IdFixtures, PartyFixtures};

/// Builder for constructing test applications
#[derive(Debug, Clone)]
pub struct ApplicationBuilder {
    id: Option<SubmissionId>,
    version: Option<SubmissionVersion>,
    broker: Broker,
    insured: Insured,
    financials: Finance,
    coverage: Vec<Coverage>,
    carrier: String,
    assessment: Option<Assessment>,
    explanation: Option<String>,
    issue_date: Option<DateTime<Utc>>,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ApplicationBuilder {
    /// Creates a builder for a complete, never-saved application
    pub fn new() -> Self {
        Self {
            id: None,
            version: None,
            broker: PartyFixtures::broker(),
            insured: PartyFixtures::insured(),
            financials: FinanceFixtures::finance(),
            coverage: FinanceFixtures::coverage(),
            carrier: DEFAULT_CARRIER.to_string(),
            assessment: None,
            explanation: None,
            issue_date: None,
        }
    }

    /// Sets the id and version
    pub fn with_reference(mut self, id: &str, version: &str) -> Self {
        self.id = id.parse().ok();
        self.version = version.parse().ok();
        self
    }

    /// Sets the id only, leaving the version blank
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.parse().ok();
        self
    }

    pub fn with_broker(mut self, broker: Broker) -> Self {
        self.broker = broker;
        self
    }

    pub fn with_insured(mut self, insured: Insured) -> Self {
        self.insured = insured;
        self
    }

    /// Sets the insured's name, keeping the rest of the insured fixture
    pub fn with_insured_name(mut self, name: impl Into<String>) -> Self {
        self.insured.name = name.into();
        self
    }

    /// Sets the broker's name, keeping the rest of the broker fixture
    pub fn with_broker_name(mut self, name: impl Into<String>) -> Self {
        self.broker.name = name.into();
        self
    }

    pub fn with_financials(mut self, financials: Finance) -> Self {
        self.financials = financials;
        self
    }

    pub fn with_coverage(mut self, coverage: Vec<Coverage>) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn with_carrier(mut self, carrier: impl Into<String>) -> Self {
        self.carrier = carrier.into();
        self
    }

    /// Marks the application as assessed
    pub fn with_assessment(mut self, assessment: Assessment) -> Self {
        self.assessment = Some(assessment);
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    pub fn with_issue_date(mut self, issue_date: DateTime<Utc>) -> Self {
        self.issue_date = Some(issue_date);
        self
    }

    /// Builds an application submitted and assessed as CREATED
    pub fn submitted(self) -> Self {
        self.with_reference(IdFixtures::submission_id().as_str(), "1.0")
            .with_assessment(Assessment::Created)
    }

    pub fn build(self) -> Application {
        Application {
            submission_reference: SubmissionReference {
                id: self.id,
                version: self.version,
            },
            broker: self.broker,
            carrier: self.carrier,
            insured: self.insured,
            financials: self.financials,
            coverage: self.coverage,
            assessment: self.assessment,
            explanation: self.explanation,
            issue_date: self.issue_date,
        }
    }
}

/// Builder for constructing quote records
#[derive(Debug, Clone)]
pub struct ReviewBuilder {
    id: SubmissionId,
    version: SubmissionVersion,
    assessment: Assessment,
    explanation: String,
    issue_date: Option<DateTime<Utc>>,
}

impl ReviewBuilder {
    /// A quote for `id` at version 1.0, assessed as CREATED
    pub fn for_id(id: &SubmissionId) -> Self {
        Self {
            id: id.clone(),
            version: IdFixtures::first_version(),
            assessment: Assessment::Created,
            explanation: String::new(),
            issue_date: Some(IdFixtures::issue_date()),
        }
    }

    pub fn with_version(mut self, version: SubmissionVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_assessment(mut self, assessment: Assessment) -> Self {
        self.assessment = assessment;
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    pub fn with_issue_date(mut self, issue_date: Option<DateTime<Utc>>) -> Self {
        self.issue_date = issue_date;
        self
    }

    pub fn build(self) -> SubmissionReview {
        SubmissionReview {
            submission_reference: SubmissionReference::new(self.id, self.version),
            assessment: self.assessment,
            explanation: self.explanation,
            issue_date: self.issue_date,
        }
    }
}

/// Builds a listing row for the given names and assessment
pub fn activity_row(insured: &str, broker: &str, assessment: Assessment) -> ActivityRow {
    let application = ApplicationBuilder::new()
        .with_insured_name(insured)
        .with_broker_name(broker)
        .build();
    ActivityRow::from_application(&application, assessment)
}
