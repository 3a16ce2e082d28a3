//! Identifiers
//!
//! `SessionId` and `ResumeToken` never leave this service except as opaque
//! handles, so they are plain UUIDs. `SubmissionId` is shared with the
//! upstream backend and follows its `LYD<6 digits><unix millis>` format.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

/// Random server-side handles, shown as `<PREFIX>-<uuid>`
///
/// JSON carries the bare uuid; parsing accepts either form.
macro_rules! uuid_handle {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "-{}"), self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Uuid::parse_str(raw).map(Self)
            }
        }
    };
}

// Dashboard session identifiers
uuid_handle!(SessionId, "SES");
uuid_handle!(ResumeToken, "RSM");

/// Prefix carried by every dashboard-issued submission id
pub const SUBMISSION_ID_PREFIX: &str = "LYD";

/// Identifier of a submission as known to the upstream backend
///
/// Ids are opaque to the dashboard once issued: anything non-blank that the
/// upstream returns is accepted, while freshly generated ids always have the
/// form `LYD` + six random digits + the current unix time in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubmissionId(String);

impl SubmissionId {
    /// Generates a fresh submission id
    pub fn generate() -> Self {
        // 100000..=999999, drawn from the random bits of a v4 UUID
        let digits = 100_000 + (Uuid::new_v4().as_u128() % 900_000) as u64;
        let millis = Utc::now().timestamp_millis();
        Self(format!("{SUBMISSION_ID_PREFIX}{digits}{millis}"))
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the id was issued by this dashboard
    pub fn is_dashboard_issued(&self) -> bool {
        self.0
            .strip_prefix(SUBMISSION_ID_PREFIX)
            .map(|rest| rest.len() >= 6 && rest.chars().all(|c| c.is_ascii_digit()))
            .unwrap_or(false)
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SubmissionId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.contains('/') {
            return Err(CoreError::InvalidSubmissionId(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl TryFrom<String> for SubmissionId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SubmissionId> for String {
    fn from(id: SubmissionId) -> String {
        id.0
    }
}
