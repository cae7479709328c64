//! Validation outcomes and severities

use serde::{Deserialize, Serialize};

/// Severity of a validation outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationSeverity {
    /// No validation issues
    None,
    /// Informational message
    Info,
    /// Warning; the value is suspect but not rejected outright
    Warning,
    /// Validation failed
    Error,
}

/// Result of validating one field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    /// The field that was validated
    pub field: String,
    /// Severity of the outcome
    pub severity: ValidationSeverity,
    /// Message for display; empty on success
    pub message: String,
}

impl ValidationOutcome {
    /// Whether the validation passed (`None` and `Info` count as valid).
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(
            self.severity,
            ValidationSeverity::None | ValidationSeverity::Info
        )
    }

    /// Successful outcome for `field`.
    #[must_use]
    pub fn success(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            severity: ValidationSeverity::None,
            message: String::new(),
        }
    }

    /// Informational outcome.
    #[must_use]
    pub fn info(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            severity: ValidationSeverity::Info,
            message: message.into(),
        }
    }

    /// Warning outcome.
    #[must_use]
    pub fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            severity: ValidationSeverity::Warning,
            message: message.into(),
        }
    }

    /// Failed outcome.
    #[must_use]
    pub fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            severity: ValidationSeverity::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn info_counts_as_valid() {
        assert!(ValidationOutcome::success("f").is_valid());
        assert!(ValidationOutcome::info("f", "note").is_valid());
        assert!(!ValidationOutcome::warning("f", "hmm").is_valid());
        assert!(!ValidationOutcome::error("f", "no").is_valid());
    }
}
