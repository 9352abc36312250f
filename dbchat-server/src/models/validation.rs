//! Validation error types

use std::fmt;

/// Validation error for request models
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    Empty { field: &'static str },

    /// Field exceeds maximum length
    TooLong { field: &'static str, max: usize },

    /// Input could not be read as the expected shape
    InvalidFormat {
        field: &'static str,
        reason: &'static str,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{} cannot be empty", field),
            Self::TooLong { field, max } => {
                write!(f, "{} exceeds maximum length of {} characters", field, max)
            }
            Self::InvalidFormat { field, reason } => write!(f, "{} is invalid: {}", field, reason),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "question",
            max: 2000,
        };
        assert_eq!(
            err.to_string(),
            "question exceeds maximum length of 2000 characters"
        );
        assert_eq!(
            ValidationError::Empty { field: "question" }.to_string(),
            "question cannot be empty"
        );
        assert_eq!(
            ValidationError::InvalidFormat {
                field: "request body",
                reason: "expected JSON"
            }
            .to_string(),
            "request body is invalid: expected JSON"
        );
    }
}
