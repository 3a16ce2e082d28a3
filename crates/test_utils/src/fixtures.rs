//! Pre-built Test Fixtures
//!
//! Provides ready-to-use step data that passes validation. Tests change the
//! one field they care about and keep the rest.

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;

use core_kernel::{SubmissionId, SubmissionVersion};
use domain_submission::{Broker, Claims, Coverage, CoverageType, Finance, Insured};

/// Fixture for broker and insured details
pub struct PartyFixtures;

impl PartyFixtures {
    /// A broker passing every broker rule
    pub fn broker() -> Broker {
        Broker {
            name: "Ann Lee".to_string(),
            organization: "Lee Brokerage".to_string(),
            address: "100 Congress Ave".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            zipcode: "73301".to_string(),
        }
    }

    /// An insured passing every insured rule
    pub fn insured() -> Insured {
        Insured {
            name: "Acme Holdings".to_string(),
            address: "2 Harbor Way".to_string(),
            city: "Boston".to_string(),
            state: "MA".to_string(),
            zipcode: "02110".to_string(),
            naics: vec!["541511".to_string()],
        }
    }
}

/// Fixture for financial step data
pub struct FinanceFixtures;

impl FinanceFixtures {
    /// Year-end figures for a mid-sized company
    pub fn finance() -> Finance {
        Finance {
            employee_count: 120,
            revenue: dec!(12500000),
            current_assets: dec!(3400000),
            current_liabilities: dec!(1100000),
            total_assets: dec!(9800000),
            total_liabilities: dec!(4200000),
            net_income_loss: dec!(750000),
            retained_earning: Some(dec!(2100000)),
            end_ebit: None,
        }
    }

    /// One D&O line with default limit and retention
    pub fn coverage() -> Vec<Coverage> {
        vec![Coverage::with_defaults(CoverageType::DirectorsAndOfficers)]
    }

    /// D&O and EPL with a claims history on the EPL line
    pub fn coverage_with_claims() -> Vec<Coverage> {
        let mut epl = Coverage::with_defaults(CoverageType::Epl);
        epl.claims = Claims {
            count: 2,
            payout: dec!(45000),
            remarks: "Settled wrongful termination suits".to_string(),
        };
        vec![Coverage::with_defaults(CoverageType::DirectorsAndOfficers), epl]
    }
}

/// Fixture for identifiers and dates
pub struct IdFixtures;

impl IdFixtures {
    /// A deterministic dashboard-style submission id
    pub fn submission_id() -> SubmissionId {
        "LYD1234561700000000000".parse().unwrap()
    }

    pub fn other_submission_id() -> SubmissionId {
        "LYD6543211700000000001".parse().unwrap()
    }

    pub fn first_version() -> SubmissionVersion {
        SubmissionVersion::initial()
    }

    /// Issue date used by quote fixtures (Mar 1, 2024)
    pub fn issue_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }
}
