//! Application aggregate
//!
//! An `Application` is the full submission draft: who brokers it, who is to
//! be insured, the insured's financials and the coverage requested. The
//! upstream backend owns the `assessment`, `explanation` and `issue_date`
//! fields once the application has been submitted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::serde_helpers::blank_as_none;
use core_kernel::{SubmissionId, SubmissionVersion};

use crate::assessment::{Assessment, AssessmentOutcome};
use crate::coverage::{Coverage, CoverageType};

/// Carrier every submission is filed with unless told otherwise
///
/// The spelling matches the value the upstream backend stores.
pub const DEFAULT_CARRIER: &str = "Llyod";

/// The id/version pair identifying one revision of an application
///
/// Both halves are blank on a fresh draft and are assigned by
/// [`crate::versioning::generate_updated_application`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReference {
    #[serde(default, with = "blank_as_none")]
    pub id: Option<SubmissionId>,
    #[serde(default, with = "blank_as_none")]
    pub version: Option<SubmissionVersion>,
}

impl SubmissionReference {
    /// Creates a reference for an existing revision
    pub fn new(id: SubmissionId, version: SubmissionVersion) -> Self {
        Self {
            id: Some(id),
            version: Some(version),
        }
    }
}

/// Broker placing the submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Broker {
    pub name: String,
    pub organization: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
}

/// Organisation applying for cover
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Insured {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    /// NAICS industry codes
    pub naics: Vec<String>,
}

/// Most recent year-end financials of the insured
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Finance {
    pub employee_count: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_assets: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_liabilities: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_assets: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_liabilities: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub net_income_loss: Decimal,
    #[serde(alias = "retained_earnings", with = "rust_decimal::serde::float_option")]
    pub retained_earning: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub end_ebit: Option<Decimal>,
}

/// A submission draft or revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    #[serde(default)]
    pub submission_reference: SubmissionReference,
    #[serde(default)]
    pub broker: Broker,
    #[serde(default = "default_carrier")]
    pub carrier: String,
    #[serde(default)]
    pub insured: Insured,
    #[serde(default)]
    pub financials: Finance,
    #[serde(default)]
    pub coverage: Vec<Coverage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<Assessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<DateTime<Utc>>,
}

fn default_carrier() -> String {
    DEFAULT_CARRIER.to_string()
}

impl Default for Application {
    fn default() -> Self {
        Self::new_draft()
    }
}

impl Application {
    /// Creates an empty draft: blank reference, blank parties, zeroed financials
    pub fn new_draft() -> Self {
        Self {
            submission_reference: SubmissionReference::default(),
            broker: Broker::default(),
            carrier: default_carrier(),
            insured: Insured::default(),
            financials: Finance::default(),
            coverage: Vec::new(),
            assessment: None,
            explanation: None,
            issue_date: None,
        }
    }

    /// Returns the submission id, if one has been assigned
    pub fn id(&self) -> Option<&SubmissionId> {
        self.submission_reference.id.as_ref()
    }

    /// Returns the submission version, if one has been assigned
    pub fn version(&self) -> Option<&SubmissionVersion> {
        self.submission_reference.version.as_ref()
    }

    /// True once the upstream has taken a final decision
    ///
    /// Locked applications can no longer be edited or re-decided.
    pub fn is_locked(&self) -> bool {
        self.assessment.as_ref().is_some_and(Assessment::is_terminal)
    }

    /// True if this revision has already been sent for assessment
    pub fn is_submitted(&self) -> bool {
        self.id().is_some() && self.assessment.is_some()
    }

    /// Replaces the coverage list with the given selection
    ///
    /// Entries for types that stay selected keep their limit, retention and
    /// claims history; newly selected types get the standard defaults.
    /// Selection order is preserved and duplicates are ignored.
    pub fn select_coverages(&mut self, types: &[CoverageType]) {
        let mut selected: Vec<Coverage> = Vec::with_capacity(types.len());
        for coverage_type in types {
            if selected.iter().any(|c| c.coverage_type == *coverage_type) {
                continue;
            }
            let entry = self
                .coverage
                .iter()
                .find(|c| c.coverage_type == *coverage_type)
                .cloned()
                .unwrap_or_else(|| Coverage::with_defaults(*coverage_type));
            selected.push(entry);
        }
        self.coverage = selected;
    }

    /// Coverage types joined for display, e.g. `D&O / EPL`
    pub fn coverage_labels(&self) -> String {
        self.coverage
            .iter()
            .map(|c| c.coverage_type.label())
            .collect::<Vec<_>>()
            .join(" / ")
    }

    /// Overwrites the server-owned fields with an assessment outcome
    pub fn apply_outcome(&mut self, outcome: &AssessmentOutcome) {
        self.assessment = Some(outcome.assessment.clone());
        self.explanation = Some(outcome.explanation.clone());
        if outcome.issue_date.is_some() {
            self.issue_date = outcome.issue_date;
        }
    }
}
