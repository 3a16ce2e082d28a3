//! Infrastructure HTTP Layer
//!
//! This crate talks to the upstream submissions backend over REST/JSON and
//! implements the domain ports on top of it.
//!
//! # Architecture
//!
//! [`ApiClient`] owns a pooled `reqwest::Client` and the upstream settings.
//! Adapters borrow it:
//!
//! - [`HttpSubmissionAdapter`] implements `SubmissionPort` for one signed-in
//!   user, attaching that user's upstream token to every request
//! - [`HttpAuthAdapter`] implements `AuthPort` against `/auth/login`
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_http::{ApiClient, HttpClientConfig};
//!
//! let client = ApiClient::new(HttpClientConfig::new("https://api.example.com"))?;
//! let port = client.submissions(session.upstream_token.clone());
//! let rows = activity.load_rows(&port).await?;
//! ```

pub mod client;
pub mod error;
pub mod wire;
pub mod adapters;

pub use client::{ApiClient, AssessmentMethod, AuthHeaderScheme, HttpClientConfig};
pub use error::HttpClientError;
pub use adapters::{HttpAuthAdapter, HttpSubmissionAdapter};
