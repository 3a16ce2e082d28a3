//! Submission versions
//!
//! The upstream backend stores versions as decimal strings (`"1.0"`,
//! `"2.0"`, ...). A version is bumped by exactly one whole unit each time an
//! application is resubmitted and is rendered with a single decimal place.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Version assigned to a brand-new application
pub const INITIAL_VERSION: &str = "1.0";

/// A string-encoded submission version
///
/// The original text is preserved until the version is incremented, so a
/// version received as `"2"` is sent back unchanged on a plain save.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionVersion(String);

impl SubmissionVersion {
    /// The version of a brand-new application
    pub fn initial() -> Self {
        Self(INITIAL_VERSION.to_string())
    }

    /// Returns the version text as received or generated
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the version as a decimal number
    ///
    /// Only plain, non-negative decimal strings are accepted; anything else
    /// (`"v2"`, `"1.2.3"`, `"-1"`) is reported as an invalid version.
    pub fn numeric(&self) -> Result<Decimal, CoreError> {
        let value = Decimal::from_str(self.0.trim())
            .map_err(|_| CoreError::InvalidVersion(self.0.clone()))?;
        if value.is_sign_negative() {
            return Err(CoreError::InvalidVersion(self.0.clone()));
        }
        Ok(value)
    }

    /// Returns the next version: this version plus 1.0, one decimal place
    pub fn increment(&self) -> Result<Self, CoreError> {
        let mut next = (self.numeric()? + Decimal::ONE)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
        next.rescale(1);
        Ok(Self(next.to_string()))
    }
}

impl Default for SubmissionVersion {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for SubmissionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SubmissionVersion {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidVersion(s.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> SubmissionVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_increment_whole_versions() {
        assert_eq!(v("1.0").increment().unwrap().as_str(), "2.0");
        assert_eq!(v("9.0").increment().unwrap().as_str(), "10.0");
    }

    #[test]
    fn test_increment_pads_to_one_decimal() {
        assert_eq!(v("2").increment().unwrap().as_str(), "3.0");
    }

    #[test]
    fn test_increment_keeps_fraction() {
        assert_eq!(v("1.5").increment().unwrap().as_str(), "2.5");
        assert_eq!(v("1.25").increment().unwrap().as_str(), "2.3");
    }

    #[test]
    fn test_non_numeric_versions_are_rejected() {
        assert!(v("v2").increment().is_err());
        assert!(v("1.2.3").increment().is_err());
        assert!(v("-1.0").increment().is_err());
    }

    #[test]
    fn test_blank_version_does_not_parse() {
        assert!("".parse::<SubmissionVersion>().is_err());
    }
}
