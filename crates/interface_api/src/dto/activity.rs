//! Activity listing DTOs

use serde::{Deserialize, Serialize};

use domain_activity::{
    ActivityColumn, ActivityError, ActivityPage, ActivityQuery, ActivityRow, SortSpec,
    DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS,
};
use domain_submission::Assessment;

/// Query string of `GET /activity`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ActivityParams {
    pub search: Option<String>,
    pub assessment: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl TryFrom<ActivityParams> for ActivityQuery {
    type Error = ActivityError;

    fn try_from(params: ActivityParams) -> Result<Self, Self::Error> {
        let sort = match params.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(column) => {
                let column: ActivityColumn = column.parse()?;
                let direction = match params.direction.as_deref() {
                    Some(direction) => direction.parse()?,
                    None => Default::default(),
                };
                Some(SortSpec { column, direction })
            }
            None => None,
        };

        Ok(ActivityQuery {
            search: params.search,
            assessment: params
                .assessment
                .filter(|a| !a.trim().is_empty())
                .map(Assessment::from),
            sort,
            page: params.page.unwrap_or(1),
            page_size: params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ActivityRowView {
    #[serde(flatten)]
    pub row: ActivityRow,
    pub editable: bool,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub rows: Vec<ActivityRowView>,
    pub total_items: usize,
    pub unfiltered_items: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub page_size_options: [usize; 3],
}

impl From<ActivityPage> for ActivityResponse {
    fn from(page: ActivityPage) -> Self {
        Self {
            rows: page
                .rows
                .into_iter()
                .map(|row| ActivityRowView {
                    editable: row.is_editable(),
                    row,
                })
                .collect(),
            total_items: page.total_items,
            unfiltered_items: page.unfiltered_items,
            page: page.page,
            page_size: page.page_size,
            total_pages: page.total_pages,
            page_size_options: PAGE_SIZE_OPTIONS,
        }
    }
}
