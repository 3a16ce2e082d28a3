//! Assertions on submission ids and wizard validation errors

use core_kernel::SubmissionId;
use domain_submission::{FieldError, SubmissionError};

/// Asserts that `id` has the dashboard form `LYD` + at least six digits
pub fn assert_dashboard_id(id: &SubmissionId) {
    assert!(
        id.is_dashboard_issued(),
        "Expected an id of the form LYD<digits>, got {}",
        id
    );
}

/// Asserts that `errors` contains `field` with `message`
pub fn assert_field_error(errors: &[FieldError], field: &str, message: &str) {
    assert!(
        errors.iter().any(|e| e.field == field && e.message == message),
        "Expected {} => {:?} among {:?}",
        field,
        message,
        errors
    );
}

/// Asserts that a wizard action was rejected by step validation and
/// returns the field errors
pub fn expect_validation_errors<T: std::fmt::Debug>(result: Result<T, SubmissionError>) -> Vec<FieldError> {
    match result {
        Err(SubmissionError::Validation(errors)) => errors,
        other => panic!("Expected validation errors, got {:?}", other),
    }
}

/// Fails unless `$result` is an `Err` whose value matches `$pattern`
#[macro_export]
macro_rules! assert_err_variant {
    ($result:expr, $pattern:pat) => {
        match $result {
            Err(ref e) if matches!(e, $pattern) => {}
            Err(ref e) => panic!("{:?} is not {}", e, stringify!($pattern)),
            Ok(ref value) => panic!("Expected {}, got Ok({:?})", stringify!($pattern), value),
        }
    };
}
