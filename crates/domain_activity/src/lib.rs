//! Activity Domain
//!
//! The activity view lists every submission together with its latest
//! assessment. Rows are built by left-joining the upstream `quotes`
//! collection onto the `submissions` collection, then searched, filtered,
//! sorted and paginated in memory.
//!
//! ```text
//! submissions ⟕ quotes  ->  rows  ->  search / filter  ->  sort  ->  page
//! ```

pub mod row;
pub mod merge;
pub mod query;
pub mod service;
pub mod error;

pub use row::{ActivityRow, ActivityColumn};
pub use merge::{merge_rows, MergeOptions};
pub use query::{ActivityQuery, ActivityPage, SortDirection, SortSpec, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use service::ActivityService;
pub use error::ActivityError;
