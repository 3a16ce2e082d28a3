//! Assessment status and review payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::application::SubmissionReference;

/// Decision status of a submission
///
/// The upstream backend has used more than one vocabulary over time, so
/// parsing is lenient: `DECLINED` is read as [`Assessment::Rejected`] and
/// unrecognised statuses are carried through verbatim as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Assessment {
    Created,
    Approved,
    Accepted,
    Rejected,
    Other(String),
}

impl Assessment {
    /// Wire representation
    pub fn as_str(&self) -> &str {
        match self {
            Assessment::Created => "CREATED",
            Assessment::Approved => "APPROVED",
            Assessment::Accepted => "ACCEPTED",
            Assessment::Rejected => "REJECTED",
            Assessment::Other(raw) => raw,
        }
    }

    /// Accepted and rejected submissions are final
    pub fn is_terminal(&self) -> bool {
        matches!(self, Assessment::Accepted | Assessment::Rejected)
    }
}

impl From<String> for Assessment {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "CREATED" => Assessment::Created,
            "APPROVED" => Assessment::Approved,
            "ACCEPTED" => Assessment::Accepted,
            "REJECTED" | "DECLINED" => Assessment::Rejected,
            _ => Assessment::Other(raw),
        }
    }
}

impl From<Assessment> for String {
    fn from(assessment: Assessment) -> String {
        assessment.as_str().to_string()
    }
}

impl FromStr for Assessment {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Assessment::from(s.to_string()))
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An assessment record as exchanged with the upstream
///
/// Sent as the body of an assessment update, and returned by the `quotes`
/// collection for every submission that has been assessed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReview {
    pub submission_reference: SubmissionReference,
    pub assessment: Assessment,
    #[serde(default)]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<DateTime<Utc>>,
}

impl SubmissionReview {
    /// Builds a review stamped with the current time
    pub fn new(
        submission_reference: SubmissionReference,
        assessment: Assessment,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            submission_reference,
            assessment,
            explanation: explanation.into(),
            issue_date: Some(Utc::now()),
        }
    }
}

/// Server-owned fields returned after an assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    pub assessment: Assessment,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub issue_date: Option<DateTime<Utc>>,
}

impl From<SubmissionReview> for AssessmentOutcome {
    fn from(review: SubmissionReview) -> Self {
        Self {
            assessment: review.assessment,
            explanation: review.explanation,
            issue_date: review.issue_date,
        }
    }
}
