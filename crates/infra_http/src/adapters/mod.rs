//! Port implementations backed by the upstream REST API

pub mod submission;
pub mod auth;

pub use submission::HttpSubmissionAdapter;
pub use auth::HttpAuthAdapter;
