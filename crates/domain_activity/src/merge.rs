//! Submissions ⟕ quotes

use std::collections::HashMap;

use core_kernel::SubmissionId;
use domain_submission::{Application, Assessment, SubmissionReview};

use crate::row::ActivityRow;

/// How unmatched submissions are presented
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOptions {
    /// Assessment shown when neither a quote nor the submission carries one
    pub default_assessment: Assessment,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            default_assessment: Assessment::Created,
        }
    }
}

/// Left-joins `quotes` onto `submissions` by submission id
///
/// Every submission yields exactly one row, in input order. The assessment
/// comes from the matching quote, else from the submission itself, else the
/// configured default. When several quotes share an id the one with the
/// latest issue date wins; among equal dates the later quote wins.
pub fn merge_rows(
    submissions: &[Application],
    quotes: &[SubmissionReview],
    options: &MergeOptions,
) -> Vec<ActivityRow> {
    let mut latest: HashMap<&SubmissionId, &SubmissionReview> = HashMap::new();
    for quote in quotes {
        let Some(id) = quote.submission_reference.id.as_ref() else {
            continue;
        };
        match latest.get(id) {
            Some(current) if current.issue_date > quote.issue_date => {}
            _ => {
                latest.insert(id, quote);
            }
        }
    }

    submissions
        .iter()
        .map(|application| {
            let quote = application.id().and_then(|id| latest.get(id)).copied();
            match quote {
                Some(quote) => {
                    let mut row = ActivityRow::from_application(application, quote.assessment.clone());
                    row.explanation = Some(quote.explanation.clone());
                    row.issue_date = quote.issue_date.or(row.issue_date);
                    row
                }
                None => {
                    let assessment = application
                        .assessment
                        .clone()
                        .unwrap_or_else(|| options.default_assessment.clone());
                    ActivityRow::from_application(application, assessment)
                }
            }
        })
        .collect()
}
