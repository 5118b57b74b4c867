//! Validation error types

use std::fmt;

/// Validation error for domain models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length (in characters)
    TooLong { field: &'static str, max: usize },

    /// Invalid enum variant
    InvalidVariant { field: &'static str, value: String },

    /// Integer outside its allowed range
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Field contains U+0000, which text columns cannot store
    NulCharacter { field: &'static str },

    /// Input could not be decoded at all (bad JSON, missing fields, non-numeric page)
    Malformed { field: &'static str, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidVariant { field, value } => {
                write!(f, "invalid {} value: '{}'", field, value)
            }
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => {
                if *max == i64::MAX {
                    write!(f, "{} must be at least {}, got {}", field, min, value)
                } else {
                    write!(f, "{} must be between {} and {}, got {}", field, min, max, value)
                }
            }
            Self::NulCharacter { field } => write!(f, "{} must not contain NUL characters", field),
            Self::Malformed { field, reason } => write!(f, "malformed {}: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a string field against the 1..=max character rule shared by all article text fields.
///
/// NUL is rejected too; PostgreSQL text types cannot hold it.
pub(crate) fn check_length(field: &'static str, s: &str, max: usize) -> Result<(), ValidationError> {
    if s.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if s.contains('\0') {
        return Err(ValidationError::NulCharacter { field });
    }

    if s.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "title",
            max: 100,
        };
        assert_eq!(
            err.to_string(),
            "title exceeds maximum length of 100 characters"
        );
    }

    #[test]
    fn out_of_range_display() {
        let err = ValidationError::OutOfRange {
            field: "user_submitted",
            value: 2,
            min: 0,
            max: 1,
        };
        assert_eq!(err.to_string(), "user_submitted must be between 0 and 1, got 2");

        let err = ValidationError::OutOfRange {
            field: "page",
            value: 0,
            min: 1,
            max: i64::MAX,
        };
        assert_eq!(err.to_string(), "page must be at least 1, got 0");
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 50 two-byte characters is 100 bytes but only 50 chars
        let s = "é".repeat(50);
        assert!(check_length("author", &s, 50).is_ok());
        assert!(check_length("author", &"é".repeat(51), 50).is_err());
    }

    #[test]
    fn rejects_nul_character() {
        assert_eq!(
            check_length("title", "a\0b", 100),
            Err(ValidationError::NulCharacter { field: "title" })
        );
        assert_eq!(
            check_length("agency", "\0", 50).unwrap_err().to_string(),
            "agency must not contain NUL characters"
        );
    }
}
