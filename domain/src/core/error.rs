//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid model: {0}")]
    InvalidModel(String),

    #[error("Invalid value '{value}' for {field} (expected one of: {expected})")]
    InvalidEnumValue {
        field: &'static str,
        value: String,
        expected: String,
    },
}

impl DomainError {
    pub(crate) fn invalid_enum(field: &'static str, value: &str, expected: &[&str]) -> Self {
        DomainError::InvalidEnumValue {
            field,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}
