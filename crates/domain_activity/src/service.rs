//! Activity listing service

use tracing::{debug, warn};

use domain_submission::{SubmissionFilter, SubmissionPort};

use crate::error::ActivityError;
use crate::merge::{merge_rows, MergeOptions};
use crate::query::{ActivityPage, ActivityQuery};
use crate::row::ActivityRow;

/// Loads both upstream collections and answers listing queries
#[derive(Debug, Clone, Default)]
pub struct ActivityService {
    pub options: MergeOptions,
    pub filter: SubmissionFilter,
}

impl ActivityService {
    pub fn new(options: MergeOptions, filter: SubmissionFilter) -> Self {
        Self { options, filter }
    }

    /// Fetches submissions then quotes and merges them into rows
    ///
    /// Either fetch failing fails the whole load; no partial listing is
    /// returned.
    pub async fn load_rows(&self, port: &dyn SubmissionPort) -> Result<Vec<ActivityRow>, ActivityError> {
        let submissions = port.list_submissions(&self.filter).await.map_err(|e| {
            warn!(carrier = %self.filter.carrier, error = %e, "Failed to list submissions");
            e
        })?;
        let quotes = port.list_quotes(&self.filter).await.map_err(|e| {
            warn!(carrier = %self.filter.carrier, error = %e, "Failed to list quotes");
            e
        })?;

        debug!(
            submissions = submissions.len(),
            quotes = quotes.len(),
            "Merging activity rows"
        );
        Ok(merge_rows(&submissions, &quotes, &self.options))
    }

    /// Loads fresh rows and returns the requested page
    pub async fn page(
        &self,
        port: &dyn SubmissionPort,
        query: &ActivityQuery,
    ) -> Result<ActivityPage, ActivityError> {
        let rows = self.load_rows(port).await?;
        query.apply(&rows)
    }
}
