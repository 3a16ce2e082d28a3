//! Step validation rules
//!
//! Each wizard step validates the slice of the application it edits and
//! reports problems per field so they can be shown next to the input.
//!
//! # Validation Rules
//!
//! ## Broker
//! - Name, organisation and city are required and contain only letters and spaces
//! - Address is required
//! - State is a US state or DC postal code
//! - Zipcode is exactly 5 digits
//!
//! ## Insured
//! - Same address rules as the broker
//! - At least one NAICS code, each exactly 6 digits
//!
//! ## Financial
//! - At least one coverage line, no duplicate types
//! - Limit positive, retention and claims figures non-negative

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::{Application, Broker, Finance, Insured};
use crate::coverage::Coverage;
use crate::wizard::WizardStep;

/// US state and DC postal codes accepted for addresses
pub const US_STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL",
    "IN", "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE",
    "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD",
    "TN", "TX", "UT", "VT", "VA", "WA", "WV", "WI", "WY",
];

/// A validation problem attached to a single input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted path of the offending field, e.g. `broker.zipcode`
    pub field: String,
    pub message: String,
}

/// Result of validating one step
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the step is valid
    pub is_valid: bool,
    /// List of field errors
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    /// Creates a successful validation result
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
        }
    }

    /// Adds an error to the result
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
        self.is_valid = false;
    }

    /// Converts into `Err` carrying the field errors when invalid
    pub fn into_result(self) -> Result<(), Vec<FieldError>> {
        if self.is_valid {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

/// Validator for the wizard's step forms
pub struct StepValidator;

impl StepValidator {
    /// Validates the slice of `application` edited on `step`
    ///
    /// The decision step has no inputs of its own and always validates.
    pub fn validate_step(step: WizardStep, application: &Application) -> ValidationResult {
        match step {
            WizardStep::Broker => Self::validate_broker(&application.broker),
            WizardStep::Insured => Self::validate_insured(&application.insured),
            WizardStep::Financial => {
                Self::validate_financials(&application.financials, &application.coverage)
            }
            WizardStep::Decision => ValidationResult::ok(),
        }
    }

    /// Validates the broker form
    pub fn validate_broker(broker: &Broker) -> ValidationResult {
        let mut result = ValidationResult::ok();

        lettered(
            &mut result,
            "broker.name",
            &broker.name,
            "Broker Name is required",
            "Name cannot contain numbers",
        );
        lettered(
            &mut result,
            "broker.organization",
            &broker.organization,
            "Organization Name is required",
            "Organization name cannot contain numbers",
        );
        required(
            &mut result,
            "broker.address",
            &broker.address,
            "Organization Address is required",
        );
        lettered(
            &mut result,
            "broker.city",
            &broker.city,
            "Organization City is required",
            "City name cannot contain numbers",
        );
        state(&mut result, "broker.state", &broker.state);
        zipcode(&mut result, "broker.zipcode", &broker.zipcode);

        result
    }

    /// Validates the insured form
    pub fn validate_insured(insured: &Insured) -> ValidationResult {
        let mut result = ValidationResult::ok();

        lettered(
            &mut result,
            "insured.name",
            &insured.name,
            "Applicant Name is required",
            "Name cannot contain numbers",
        );
        required(&mut result, "insured.address", &insured.address, "Address is required");
        lettered(
            &mut result,
            "insured.city",
            &insured.city,
            "City is required",
            "City name cannot contain numbers",
        );
        state(&mut result, "insured.state", &insured.state);
        zipcode(&mut result, "insured.zipcode", &insured.zipcode);

        let codes: Vec<&str> = insured
            .naics
            .iter()
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .collect();
        if codes.is_empty() {
            result.add_error("insured.naics", "NAICS is required");
        }
        for (index, code) in codes.iter().enumerate() {
            if !is_digits(code, 6) {
                result.add_error(format!("insured.naics[{index}]"), "NAICS must be exactly 6 digits");
            }
        }

        result
    }

    /// Validates the financial form and the coverage selection
    pub fn validate_financials(finance: &Finance, coverage: &[Coverage]) -> ValidationResult {
        let mut result = ValidationResult::ok();

        // Liabilities and net income may legitimately be negative; assets and
        // revenue may not.
        for (field, value) in [
            ("financials.revenue", finance.revenue),
            ("financials.current_assets", finance.current_assets),
            ("financials.total_assets", finance.total_assets),
        ] {
            if value < Decimal::ZERO {
                result.add_error(field, "Value cannot be negative");
            }
        }

        if coverage.is_empty() {
            result.add_error("coverage", "Select at least one coverage");
        }
        for (index, line) in coverage.iter().enumerate() {
            if coverage[..index].iter().any(|c| c.coverage_type == line.coverage_type) {
                result.add_error(
                    format!("coverage[{index}].type"),
                    format!("{} is selected more than once", line.coverage_type),
                );
            }
            if line.limit <= Decimal::ZERO {
                result.add_error(format!("coverage[{index}].limit"), "Limit must be greater than zero");
            }
            if line.retention < Decimal::ZERO {
                result.add_error(format!("coverage[{index}].retention"), "Retention cannot be negative");
            }
            if line.claims.payout < Decimal::ZERO {
                result.add_error(format!("coverage[{index}].claims.payout"), "Payout cannot be negative");
            }
        }

        result
    }
}

fn required(result: &mut ValidationResult, field: &str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        result.add_error(field, message);
        return false;
    }
    true
}

fn lettered(result: &mut ValidationResult, field: &str, value: &str, missing: &str, invalid: &str) {
    if required(result, field, value, missing)
        && !value.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace())
    {
        result.add_error(field, invalid);
    }
}

fn state(result: &mut ValidationResult, field: &str, value: &str) {
    if required(result, field, value, "State is required")
        && !US_STATES.contains(&value.trim().to_ascii_uppercase().as_str())
    {
        result.add_error(field, "Select a valid state");
    }
}

fn zipcode(result: &mut ValidationResult, field: &str, value: &str) {
    if required(result, field, value, "Zipcode is required") && !is_digits(value.trim(), 5) {
        result.add_error(field, "Zipcode must be exactly 5 digits");
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}
