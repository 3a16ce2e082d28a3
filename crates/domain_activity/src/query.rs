//! Search, filter, sort and pagination over listing rows

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use domain_submission::Assessment;

use crate::error::ActivityError;
use crate::row::{ActivityColumn, ActivityRow};

/// Page sizes offered by the listing
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [10, 20, 50];

/// Page size used when none is requested
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction, as toggled by clicking the column header
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = ActivityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(ActivityError::UnknownDirection(other.to_string())),
        }
    }
}

/// Column and direction to sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: ActivityColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(column: ActivityColumn) -> Self {
        Self { column, direction: SortDirection::Asc }
    }

    pub fn desc(column: ActivityColumn) -> Self {
        Self { column, direction: SortDirection::Desc }
    }

    /// Header-click behaviour: same column flips direction, a new column
    /// starts ascending
    pub fn clicked(current: Option<SortSpec>, column: ActivityColumn) -> SortSpec {
        match current {
            Some(spec) if spec.column == column => SortSpec {
                column,
                direction: spec.direction.toggled(),
            },
            _ => SortSpec::asc(column),
        }
    }
}

/// Listing request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    /// Case-insensitive substring of the insured or broker name
    pub search: Option<String>,
    /// Exact assessment to keep
    pub assessment: Option<Assessment>,
    pub sort: Option<SortSpec>,
    /// 1-based page number
    pub page: usize,
    pub page_size: usize,
}

impl Default for ActivityQuery {
    fn default() -> Self {
        Self {
            search: None,
            assessment: None,
            sort: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of listing results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityPage {
    pub rows: Vec<ActivityRow>,
    /// Rows matching search and filter
    pub total_items: usize,
    /// Rows before search and filter
    pub unfiltered_items: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl ActivityQuery {
    /// Rows passing the search and assessment filter, in input order
    ///
    /// The search text is matched as typed; only a blank one is ignored.
    pub fn filter<'a>(&self, rows: &'a [ActivityRow]) -> Vec<&'a ActivityRow> {
        let needle = self
            .search
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::to_lowercase);

        rows.iter()
            .filter(|row| needle.as_deref().map_or(true, |n| row.matches_search(n)))
            .filter(|row| self.assessment.as_ref().map_or(true, |a| &row.assessment == a))
            .collect()
    }

    /// Filters, sorts and slices `rows` into the requested page
    ///
    /// Pages past the end come back empty rather than as an error.
    pub fn apply(&self, rows: &[ActivityRow]) -> Result<ActivityPage, ActivityError> {
        if self.page == 0 {
            return Err(ActivityError::InvalidPage(self.page));
        }
        if self.page_size == 0 {
            return Err(ActivityError::InvalidPageSize(self.page_size));
        }

        let mut matched = self.filter(rows);
        if let Some(spec) = self.sort {
            sort_rows(&mut matched, spec);
        }

        let total_items = matched.len();
        let start = (self.page - 1).saturating_mul(self.page_size);
        let page_rows = matched
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();

        Ok(ActivityPage {
            rows: page_rows,
            total_items,
            unfiltered_items: rows.len(),
            page: self.page,
            page_size: self.page_size,
            total_pages: total_items.div_ceil(self.page_size),
        })
    }
}

/// Stable lexicographic sort; rows without a value always go last
fn sort_rows(rows: &mut [&ActivityRow], spec: SortSpec) {
    rows.sort_by(|a, b| {
        match (a.sort_value(spec.column), b.sort_value(spec.column)) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(x), Some(y)) => {
                let ordering = compare_text(&x, &y);
                match spec.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
        }
    });
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
