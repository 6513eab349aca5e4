//! Domain error types for TimeTracker.
//!
//! Validation failures are raised by entity constructors and setters before
//! anything reaches storage. Each variant names the offending field and keeps
//! the rejected value so callers can report it verbatim.

use thiserror::Error;

/// A field value was rejected by its format or range rule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Illegal client email: {0}")]
    Email(String),

    #[error("Illegal client phone number: {0}")]
    PhoneNumber(String),

    #[error("Illegal client timezone: {0} (expected an offset such as +02:00)")]
    Timezone(String),

    #[error("The hourly rate must be a finite number greater than or equal to 0, got {0}")]
    HourlyRate(f64),

    #[error("The fixed price must be a finite number greater than or equal to 0, got {0}")]
    FixedPrice(f64),
}

impl ValidationError {
    /// Name of the entity field that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Email(_) => "email",
            Self::PhoneNumber(_) => "phone_number",
            Self::Timezone(_) => "timezone",
            Self::HourlyRate(_) => "hourly_rate",
            Self::FixedPrice(_) => "fixed_price",
        }
    }

    /// The rejected value, rendered as text.
    pub fn value(&self) -> String {
        match self {
            Self::Email(v) | Self::PhoneNumber(v) | Self::Timezone(v) => v.clone(),
            Self::HourlyRate(v) | Self::FixedPrice(v) => v.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_names_field_and_value() {
        let err = ValidationError::Email("not-an-email".into());
        assert_eq!(err.field(), "email");
        assert_eq!(err.value(), "not-an-email");
        assert!(err.to_string().contains("not-an-email"));

        let err = ValidationError::HourlyRate(-5.0);
        assert_eq!(err.field(), "hourly_rate");
        assert_eq!(err.value(), "-5");
    }
}
