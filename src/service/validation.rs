//! Request validation from static per-field rules.

use crate::error::AppError;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Clone, Copy, Debug)]
pub enum Format {
    Email,
}

#[derive(Clone, Copy, Debug)]
pub struct ValidationRule {
    /// Reject blank (empty or whitespace-only) strings.
    pub required: bool,
    pub max_length: Option<usize>,
    pub format: Option<Format>,
}

impl ValidationRule {
    pub const fn text(required: bool, max_length: usize) -> Self {
        ValidationRule {
            required,
            max_length: Some(max_length),
            format: None,
        }
    }

    pub const fn with_format(self, format: Format) -> Self {
        ValidationRule {
            format: Some(format),
            ..self
        }
    }
}

pub struct RequestValidator;

impl RequestValidator {
    pub fn validate(field: &str, value: &str, rule: &ValidationRule) -> Result<(), AppError> {
        if rule.required && value.trim().is_empty() {
            return Err(AppError::Validation(format!("{} must not be blank", field)));
        }
        if let Some(max) = rule.max_length {
            if value.chars().count() > max {
                return Err(AppError::Validation(format!(
                    "{} must be at most {} characters",
                    field, max
                )));
            }
        }
        if let Some(format) = rule.format {
            validate_format(field, value, format)?;
        }
        Ok(())
    }

    /// Absent optional values are always valid.
    pub fn validate_optional(
        field: &str,
        value: Option<&str>,
        rule: &ValidationRule,
    ) -> Result<(), AppError> {
        match value {
            Some(v) => Self::validate(field, v, rule),
            None => Ok(()),
        }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+$").expect("static email pattern"))
}

fn validate_format(field: &str, value: &str, format: Format) -> Result<(), AppError> {
    match format {
        Format::Email => {
            if !email_regex().is_match(value) {
                return Err(AppError::Validation(format!("{} must be a valid email", field)));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: ValidationRule = ValidationRule::text(true, 5);
    const EMAIL: ValidationRule = ValidationRule::text(true, 255).with_format(Format::Email);

    #[test]
    fn blank_required_is_rejected() {
        assert!(RequestValidator::validate("name", "   ", &NAME).is_err());
        assert!(RequestValidator::validate("name", "Ann", &NAME).is_ok());
    }

    #[test]
    fn length_counts_characters() {
        assert!(RequestValidator::validate("name", "ÅÅÅÅÅ", &NAME).is_ok());
        let err = RequestValidator::validate("name", "ÅÅÅÅÅÅ", &NAME).unwrap_err();
        assert_eq!(err.to_string(), "validation: name must be at most 5 characters");
    }

    #[test]
    fn email_format() {
        assert!(RequestValidator::validate("email", "a@b.io", &EMAIL).is_ok());
        assert!(RequestValidator::validate("email", "not-an-email", &EMAIL).is_err());
        assert!(RequestValidator::validate("email", "a b@c", &EMAIL).is_err());
        assert!(RequestValidator::validate("email", "a@b@c", &EMAIL).is_err());
    }

    #[test]
    fn optional_absent_is_fine() {
        assert!(RequestValidator::validate_optional("phone", None, &NAME).is_ok());
        assert!(RequestValidator::validate_optional("phone", Some("123456"), &NAME).is_err());
    }
}
