//! Input validation for names and measurements.

use std::fmt;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
    /// Number outside the accepted range.
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(f, "{} must be between {} and {} (got {})", field, min, max, actual),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for usernames.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum allowed length for skill names.
pub const MAX_SKILL_NAME_LENGTH: usize = 255;

/// Maximum allowed length for activity, item and location names.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum allowed length for activity type names.
pub const MAX_ACTIVITY_TYPE_NAME_LENGTH: usize = 50;

/// Largest value a measurement column accepts.
pub const MAX_MEASUREMENT: u16 = 32_767;

/// Largest explicit position a row may be given.
pub const MAX_ORDER: i64 = i32::MAX as i64;

/// Validate a required, length-limited name.
///
/// Leading and trailing whitespace is ignored for both checks.
pub fn validate_name(field: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }

    Ok(())
}

/// Validate a positive small integer measurement (mmHg, bpm).
pub fn validate_measurement(field: &str, value: u16) -> Result<(), ValidationError> {
    if value == 0 || value > MAX_MEASUREMENT {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: i64::from(MAX_MEASUREMENT),
            actual: i64::from(value),
        });
    }

    Ok(())
}

/// Validate an explicit position for an ordered row (`0..=MAX_ORDER`).
pub fn validate_order(value: i64) -> Result<(), ValidationError> {
    if !(0..=MAX_ORDER).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "order".to_string(),
            min: 0,
            max: MAX_ORDER,
            actual: value,
        });
    }

    Ok(())
}
