//! Listing rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use core_kernel::{SubmissionId, SubmissionVersion};
use domain_submission::{Application, Assessment};

use crate::error::ActivityError;

/// One line of the activity listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRow {
    pub id: Option<SubmissionId>,
    pub version: Option<SubmissionVersion>,
    pub insured_name: String,
    pub broker_name: String,
    /// Coverage labels joined with ` / `
    pub coverage: String,
    pub assessment: Assessment,
    pub explanation: Option<String>,
    pub issue_date: Option<DateTime<Utc>>,
}

impl ActivityRow {
    /// Builds a row from a submission and the assessment that applies to it
    pub fn from_application(application: &Application, assessment: Assessment) -> Self {
        Self {
            id: application.id().cloned(),
            version: application.version().cloned(),
            insured_name: application.insured.name.clone(),
            broker_name: application.broker.name.clone(),
            coverage: application.coverage_labels(),
            assessment,
            explanation: application.explanation.clone(),
            issue_date: application.issue_date,
        }
    }

    /// Rows with a final decision cannot be edited
    pub fn is_editable(&self) -> bool {
        !self.assessment.is_terminal()
    }

    /// True if either name contains `needle`, ignoring case
    ///
    /// `needle` must already be lowercase.
    pub fn matches_search(&self, needle: &str) -> bool {
        self.insured_name.to_lowercase().contains(needle)
            || self.broker_name.to_lowercase().contains(needle)
    }

    /// Text used when sorting by `column`; `None` sorts last
    pub fn sort_value(&self, column: ActivityColumn) -> Option<String> {
        match column {
            ActivityColumn::Id => self.id.as_ref().map(ToString::to_string),
            ActivityColumn::Version => self.version.as_ref().map(ToString::to_string),
            ActivityColumn::InsuredName => Some(self.insured_name.clone()),
            ActivityColumn::BrokerName => Some(self.broker_name.clone()),
            ActivityColumn::Coverage => Some(self.coverage.clone()),
            ActivityColumn::Assessment => Some(self.assessment.to_string()),
            ActivityColumn::IssueDate => self.issue_date.map(|d| d.to_rfc3339()),
        }
    }
}

/// Sortable listing columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityColumn {
    Id,
    Version,
    InsuredName,
    BrokerName,
    Coverage,
    Assessment,
    IssueDate,
}

impl FromStr for ActivityColumn {
    type Err = ActivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(ActivityColumn::Id),
            "version" => Ok(ActivityColumn::Version),
            "insured_name" | "name" => Ok(ActivityColumn::InsuredName),
            "broker_name" => Ok(ActivityColumn::BrokerName),
            "coverage" => Ok(ActivityColumn::Coverage),
            "assessment" | "decision" => Ok(ActivityColumn::Assessment),
            "issue_date" => Ok(ActivityColumn::IssueDate),
            other => Err(ActivityError::UnknownColumn(other.to_string())),
        }
    }
}
