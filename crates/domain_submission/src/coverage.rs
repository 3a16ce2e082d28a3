//! Requested coverage lines

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SubmissionError;

/// Limit applied when a coverage type is first selected
pub const DEFAULT_LIMIT: Decimal = dec!(50000);

/// Retention applied when a coverage type is first selected
pub const DEFAULT_RETENTION: Decimal = Decimal::ZERO;

/// Management liability lines offered on the intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CoverageType {
    /// Directors & officers liability
    #[serde(rename = "D&O")]
    DirectorsAndOfficers,
    /// Employment practices liability
    #[serde(rename = "EPL")]
    Epl,
    /// Fiduciary liability
    #[serde(rename = "FID")]
    Fiduciary,
}

impl CoverageType {
    /// All selectable coverage types, in form order
    pub const ALL: [CoverageType; 3] = [
        CoverageType::DirectorsAndOfficers,
        CoverageType::Epl,
        CoverageType::Fiduciary,
    ];

    /// Short label shown in listings
    pub fn label(&self) -> &'static str {
        match self {
            CoverageType::DirectorsAndOfficers => "D&O",
            CoverageType::Epl => "EPL",
            CoverageType::Fiduciary => "FID",
        }
    }
}

impl fmt::Display for CoverageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CoverageType {
    type Err = SubmissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoverageType::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SubmissionError::UnknownCoverage(s.to_string()))
    }
}

/// Prior claims history for a coverage line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Claims {
    pub count: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub payout: Decimal,
    pub remarks: String,
}

/// A single requested coverage line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    #[serde(rename = "type")]
    pub coverage_type: CoverageType,
    #[serde(with = "rust_decimal::serde::float")]
    pub limit: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub retention: Decimal,
    #[serde(default)]
    pub claims: Claims,
}

impl Coverage {
    /// Creates a coverage line with the standard limit and retention
    pub fn with_defaults(coverage_type: CoverageType) -> Self {
        Self {
            coverage_type,
            limit: DEFAULT_LIMIT,
            retention: DEFAULT_RETENTION,
            claims: Claims::default(),
        }
    }
}
