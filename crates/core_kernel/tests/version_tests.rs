//! Property tests for submission version increments

use core_kernel::SubmissionVersion;
use proptest::prelude::*;
use rust_decimal::Decimal;

proptest! {
    #[test]
    fn whole_versions_increment_by_one(n in 1u32..10_000u32) {
        let version: SubmissionVersion = format!("{n}.0").parse().unwrap();
        let next = version.increment().unwrap();
        prop_assert_eq!(next.as_str(), format!("{}.0", n + 1));
    }

    #[test]
    fn increment_always_has_one_decimal_place(whole in 0u32..10_000u32, tenth in 0u32..10u32) {
        let version: SubmissionVersion = format!("{whole}.{tenth}").parse().unwrap();
        let next = version.increment().unwrap();
        let (_, fraction) = next.as_str().split_once('.').unwrap();
        prop_assert_eq!(fraction.len(), 1);
        prop_assert_eq!(next.numeric().unwrap(), version.numeric().unwrap() + Decimal::ONE);
    }
}
