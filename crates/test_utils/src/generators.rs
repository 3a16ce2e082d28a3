//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating test data that maintains
//! domain invariants.

use proptest::prelude::*;
use rust_decimal::Decimal;

use core_kernel::SubmissionVersion;
use domain_activity::{ActivityColumn, ActivityRow, SortDirection, SortSpec};
use domain_submission::{Application, Assessment, CoverageType};

use crate::builders::ApplicationBuilder;

/// Strategy for one-decimal versions such as "1.0" or "12.0"
pub fn whole_version_strategy() -> impl Strategy<Value = SubmissionVersion> {
    (1u32..10_000u32).prop_map(|n| {
        format!("{n}.0")
            .parse()
            .unwrap_or_else(|_| SubmissionVersion::initial())
    })
}

/// Strategy for any non-negative decimal version string
pub fn decimal_version_strategy() -> impl Strategy<Value = String> {
    (0i64..1_000_000i64, 0u32..4u32).prop_map(|(m, s)| Decimal::new(m, s).to_string())
}

/// Strategy for assessments, including unrecognised upstream statuses
pub fn assessment_strategy() -> impl Strategy<Value = Assessment> {
    prop_oneof![
        Just(Assessment::Created),
        Just(Assessment::Approved),
        Just(Assessment::Accepted),
        Just(Assessment::Rejected),
        Just(Assessment::Other("REFERRED".to_string())),
    ]
}

/// Strategy for coverage types
pub fn coverage_type_strategy() -> impl Strategy<Value = CoverageType> {
    prop_oneof![
        Just(CoverageType::DirectorsAndOfficers),
        Just(CoverageType::Epl),
        Just(CoverageType::Fiduciary),
    ]
}

/// Strategy for names made of letters and spaces
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z ]{0,24}"
}

/// Strategy for applications that were never saved
pub fn unsaved_application_strategy() -> impl Strategy<Value = Application> {
    (name_strategy(), name_strategy()).prop_map(|(insured, broker)| {
        ApplicationBuilder::new()
            .with_insured_name(insured)
            .with_broker_name(broker)
            .build()
    })
}

/// Strategy for listing rows
pub fn activity_row_strategy() -> impl Strategy<Value = ActivityRow> {
    (name_strategy(), name_strategy(), assessment_strategy()).prop_map(
        |(insured, broker, assessment)| crate::builders::activity_row(&insured, &broker, assessment),
    )
}

/// Strategy for listing sort specs
pub fn sort_spec_strategy() -> impl Strategy<Value = SortSpec> {
    let column = prop_oneof![
        Just(ActivityColumn::Id),
        Just(ActivityColumn::Version),
        Just(ActivityColumn::InsuredName),
        Just(ActivityColumn::BrokerName),
        Just(ActivityColumn::Coverage),
        Just(ActivityColumn::Assessment),
        Just(ActivityColumn::IssueDate),
    ];
    let direction = prop_oneof![Just(SortDirection::Asc), Just(SortDirection::Desc)];
    (column, direction).prop_map(|(column, direction)| SortSpec { column, direction })
}
