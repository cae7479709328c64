//! Survey Validation - the constraint rule mini-language
//!
//! Validation rules attached to questions travel as `key:param` strings
//! (`"minlength:3"`, `"range:1,10"`, `"email:true"`). This crate keeps that
//! vocabulary and parsing convention as a wire contract and evaluates rules
//! as pure functions; debouncing and input streams are the hosting UI's
//! concern.
//!
//! Malformed rules are lenient by design: a record that cannot be parsed
//! validates as success (with a warning log), so a bad constraint row never
//! blocks a respondent.
//!
//! # Example
//!
//! ```rust
//! use survey_validation::{validate_record, ValidationSeverity};
//!
//! let outcome = validate_record("email", "not-an-address", "email:true");
//! assert_eq!(outcome.severity, ValidationSeverity::Error);
//!
//! assert!(validate_record("email", "user@example.com", "email:true").is_valid());
//! ```

pub mod outcome;
pub mod rule;

pub use outcome::{ValidationOutcome, ValidationSeverity};
pub use rule::{Rule, RuleParseError};

use tracing::warn;

/// Validate `value` against one `key:param` rule record.
///
/// Unknown keys and malformed records validate as success; the exact rule
/// semantics live on [`Rule::apply`].
#[must_use]
pub fn validate_record(field: &str, value: &str, record: &str) -> ValidationOutcome {
    match record.parse::<Rule>() {
        Ok(rule) => rule.apply(field, value),
        Err(reason) => {
            warn!(record, %reason, "ignoring malformed validation rule");
            ValidationOutcome::success(field)
        }
    }
}

/// Validate `value` against a list of rule records; the first failing
/// record wins, success otherwise.
#[must_use]
pub fn validate_all(field: &str, value: &str, records: &[&str]) -> ValidationOutcome {
    for record in records {
        let outcome = validate_record(field, value, record);
        if !outcome.is_valid() {
            return outcome;
        }
    }
    ValidationOutcome::success(field)
}

/// Collapse several outcomes into one by severity: the first error wins,
/// then the first warning, then the first info, then the first outcome.
#[must_use]
pub fn combine(outcomes: &[ValidationOutcome]) -> ValidationOutcome {
    for severity in [
        ValidationSeverity::Error,
        ValidationSeverity::Warning,
        ValidationSeverity::Info,
    ] {
        if let Some(outcome) = outcomes.iter().find(|o| o.severity == severity) {
            return outcome.clone();
        }
    }
    outcomes
        .first()
        .cloned()
        .unwrap_or_else(|| ValidationOutcome::success(""))
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
