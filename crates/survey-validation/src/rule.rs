//! Parsing and evaluation of `key:param` rule records

use crate::outcome::ValidationOutcome;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
        .case_insensitive(true)
        .build()
        .expect("email pattern compiles")
});

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d\s\-\(\)\+]+$").expect("phone pattern compiles"));

/// A rule record that could not be parsed.
///
/// The lenient entry points treat these as "no rule"; the typed parser
/// surfaces them for tooling that wants to reject bad constraint rows up
/// front.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleParseError {
    /// The record has no `key:param` separator
    #[error("rule record has no `key:param` separator")]
    MissingSeparator,
    /// The key is not part of the rule vocabulary
    #[error("unknown rule key: {0}")]
    UnknownKey(String),
    /// The parameter does not parse for this key
    #[error("invalid parameter for {key}: {param:?}")]
    InvalidParameter {
        /// Rule key as written in the record
        key: String,
        /// Offending parameter text
        param: String,
    },
}

/// One parsed validation rule.
///
/// The wire form is `key:param` with the key matched case-insensitively:
/// `required`, `minlength`/`min`, `maxlength`/`max`, `pattern`, `range`,
/// `email`, `phone`, `url`.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Value must be non-blank when the parameter is `true`
    Required(bool),
    /// Minimum character count (empty values pass)
    MinLength(i64),
    /// Maximum character count (empty values pass)
    MaxLength(i64),
    /// Value must match the regex (empty values pass)
    Pattern(String),
    /// Numeric value must fall within `min..=max`
    Range {
        /// Lower bound, inclusive
        min: f64,
        /// Upper bound, inclusive
        max: f64,
    },
    /// Value must look like an email address
    Email,
    /// Value must look like a phone number
    Phone,
    /// Value must be an absolute http(s) URL
    Url,
}

impl FromStr for Rule {
    type Err = RuleParseError;

    fn from_str(record: &str) -> Result<Self, Self::Err> {
        let (key, param) = record
            .split_once(':')
            .ok_or(RuleParseError::MissingSeparator)?;
        let key = key.trim().to_lowercase();
        let param = param.trim();

        let invalid = |param: &str| RuleParseError::InvalidParameter {
            key: key.clone(),
            param: param.to_string(),
        };

        match key.as_str() {
            "required" => Ok(Self::Required(param.eq_ignore_ascii_case("true"))),
            "minlength" | "min" => param
                .parse::<i64>()
                .map(Self::MinLength)
                .map_err(|_| invalid(param)),
            "maxlength" | "max" => param
                .parse::<i64>()
                .map(Self::MaxLength)
                .map_err(|_| invalid(param)),
            "pattern" => Ok(Self::Pattern(param.to_string())),
            "range" => {
                // both "min,max" and "min-max" are in the wild
                let (low, high) = param.find([',', '-']).map_or_else(
                    || (param, ""),
                    |at| (&param[..at], &param[at + 1..]),
                );
                let min = low.trim().parse::<f64>().map_err(|_| invalid(param))?;
                let max = high.trim().parse::<f64>().map_err(|_| invalid(param))?;
                Ok(Self::Range { min, max })
            }
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            "url" => Ok(Self::Url),
            _ => Err(RuleParseError::UnknownKey(key)),
        }
    }
}

impl Rule {
    /// Evaluate this rule against a field value.
    #[must_use]
    pub fn apply(&self, field: &str, value: &str) -> ValidationOutcome {
        match self {
            Self::Required(required) => {
                if *required && value.trim().is_empty() {
                    ValidationOutcome::error(field, "This field is required")
                } else {
                    ValidationOutcome::success(field)
                }
            }
            Self::MinLength(min) => {
                if value.is_empty() {
                    return ValidationOutcome::success(field);
                }
                if (value.chars().count() as i64) < *min {
                    ValidationOutcome::error(field, format!("Must be at least {min} characters"))
                } else {
                    ValidationOutcome::success(field)
                }
            }
            Self::MaxLength(max) => {
                if value.is_empty() {
                    return ValidationOutcome::success(field);
                }
                if (value.chars().count() as i64) > *max {
                    ValidationOutcome::error(field, format!("Must not exceed {max} characters"))
                } else {
                    ValidationOutcome::success(field)
                }
            }
            Self::Pattern(pattern) => {
                if value.is_empty() {
                    return ValidationOutcome::success(field);
                }
                match Regex::new(pattern) {
                    Ok(regex) if regex.is_match(value) => ValidationOutcome::success(field),
                    Ok(_) => ValidationOutcome::error(
                        field,
                        "Value does not match the required pattern",
                    ),
                    Err(reason) => {
                        warn!(pattern, %reason, "invalid validation pattern");
                        ValidationOutcome::warning(field, "Pattern validation unavailable")
                    }
                }
            }
            Self::Range { min, max } => {
                if value.is_empty() {
                    return ValidationOutcome::success(field);
                }
                let Ok(number) = value.trim().parse::<f64>() else {
                    return ValidationOutcome::error(field, "Must be a valid number");
                };
                if number < *min || number > *max {
                    ValidationOutcome::error(field, format!("Must be between {min} and {max}"))
                } else {
                    ValidationOutcome::success(field)
                }
            }
            Self::Email => {
                if value.is_empty() || EMAIL_PATTERN.is_match(value) {
                    ValidationOutcome::success(field)
                } else {
                    ValidationOutcome::error(field, "Must be a valid email address")
                }
            }
            Self::Phone => {
                if value.is_empty() {
                    return ValidationOutcome::success(field);
                }
                if !PHONE_PATTERN.is_match(value) {
                    return ValidationOutcome::error(field, "Must be a valid phone number");
                }
                let significant = value
                    .chars()
                    .filter(|c| !matches!(c, ' ' | '-' | '(' | ')' | '+'))
                    .count();
                if significant < 10 {
                    ValidationOutcome::warning(field, "Phone number seems too short")
                } else {
                    ValidationOutcome::success(field)
                }
            }
            Self::Url => {
                if value.is_empty() || is_http_url(value) {
                    ValidationOutcome::success(field)
                } else {
                    ValidationOutcome::error(field, "Must be a valid URL")
                }
            }
        }
    }
}

/// Absolute URL with an http or https scheme and a non-empty host part.
fn is_http_url(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let lower = value.to_ascii_lowercase();
    let rest = if let Some(rest) = lower.strip_prefix("https://") {
        rest
    } else if let Some(rest) = lower.strip_prefix("http://") {
        rest
    } else {
        return false;
    };
    !rest.is_empty() && !rest.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::ValidationSeverity;

    #[test]
    fn parse_covers_the_vocabulary() {
        assert_eq!("required:true".parse::<Rule>(), Ok(Rule::Required(true)));
        assert_eq!("required:nope".parse::<Rule>(), Ok(Rule::Required(false)));
        assert_eq!("minlength:3".parse::<Rule>(), Ok(Rule::MinLength(3)));
        assert_eq!("min:3".parse::<Rule>(), Ok(Rule::MinLength(3)));
        assert_eq!("MAXLENGTH: 10 ".parse::<Rule>(), Ok(Rule::MaxLength(10)));
        assert_eq!(
            "pattern:^a+$".parse::<Rule>(),
            Ok(Rule::Pattern("^a+$".to_string()))
        );
        assert_eq!(
            "range:1,10".parse::<Rule>(),
            Ok(Rule::Range { min: 1.0, max: 10.0 })
        );
        assert_eq!(
            "range:1.5-2.5".parse::<Rule>(),
            Ok(Rule::Range { min: 1.5, max: 2.5 })
        );
        assert_eq!("email:true".parse::<Rule>(), Ok(Rule::Email));
        assert_eq!("phone:true".parse::<Rule>(), Ok(Rule::Phone));
        assert_eq!("url:true".parse::<Rule>(), Ok(Rule::Url));
    }

    #[test]
    fn parse_rejects_bad_records() {
        assert_eq!(
            "justakey".parse::<Rule>(),
            Err(RuleParseError::MissingSeparator)
        );
        assert_eq!(
            "mystery:1".parse::<Rule>(),
            Err(RuleParseError::UnknownKey("mystery".to_string()))
        );
        assert!(matches!(
            "minlength:abc".parse::<Rule>(),
            Err(RuleParseError::InvalidParameter { .. })
        ));
        assert!(matches!(
            "range:1".parse::<Rule>(),
            Err(RuleParseError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn required_fails_only_blank_values() {
        let rule = Rule::Required(true);
        assert!(!rule.apply("f", "   ").is_valid());
        assert!(rule.apply("f", "x").is_valid());
        assert!(Rule::Required(false).apply("f", "").is_valid());
    }

    #[test]
    fn length_rules_let_empty_values_pass() {
        assert!(Rule::MinLength(3).apply("f", "").is_valid());
        assert!(!Rule::MinLength(3).apply("f", "ab").is_valid());
        assert!(Rule::MinLength(3).apply("f", "abc").is_valid());

        assert!(Rule::MaxLength(3).apply("f", "").is_valid());
        assert!(Rule::MaxLength(3).apply("f", "abc").is_valid());
        let outcome = Rule::MaxLength(3).apply("f", "abcd");
        assert_eq!(outcome.message, "Must not exceed 3 characters");
    }

    #[test]
    fn pattern_mismatch_is_an_error_but_bad_pattern_is_a_warning() {
        let rule = Rule::Pattern("^[0-9]+$".to_string());
        assert!(rule.apply("f", "123").is_valid());
        assert_eq!(
            rule.apply("f", "12a").severity,
            ValidationSeverity::Error
        );

        let broken = Rule::Pattern("[unclosed".to_string());
        let outcome = broken.apply("f", "anything");
        assert_eq!(outcome.severity, ValidationSeverity::Warning);
        assert_eq!(outcome.message, "Pattern validation unavailable");
    }

    #[test]
    fn range_checks_numbers_inclusively() {
        let rule = Rule::Range { min: 1.0, max: 10.0 };
        assert!(rule.apply("f", "1").is_valid());
        assert!(rule.apply("f", "10").is_valid());
        assert_eq!(
            rule.apply("f", "11").message,
            "Must be between 1 and 10"
        );
        assert_eq!(rule.apply("f", "abc").message, "Must be a valid number");
    }

    #[test]
    fn email_rule_matches_basic_addresses() {
        assert!(Rule::Email.apply("f", "user@example.com").is_valid());
        assert!(Rule::Email.apply("f", "USER@EXAMPLE.COM").is_valid());
        assert!(!Rule::Email.apply("f", "user@nodot").is_valid());
        assert!(!Rule::Email.apply("f", "two words@example.com").is_valid());
    }

    #[test]
    fn phone_rule_warns_on_short_numbers() {
        assert!(Rule::Phone.apply("f", "+1 (555) 123-4567").is_valid());
        assert_eq!(
            Rule::Phone.apply("f", "555-1234").severity,
            ValidationSeverity::Warning
        );
        assert_eq!(
            Rule::Phone.apply("f", "call me").severity,
            ValidationSeverity::Error
        );
    }

    #[test]
    fn url_rule_requires_absolute_http() {
        assert!(Rule::Url.apply("f", "https://example.com/a").is_valid());
        assert!(Rule::Url.apply("f", "HTTP://example.com").is_valid());
        assert!(!Rule::Url.apply("f", "ftp://example.com").is_valid());
        assert!(!Rule::Url.apply("f", "example.com").is_valid());
        assert!(!Rule::Url.apply("f", "https://").is_valid());
    }
}
