//! Model value object identifying the language model that drives a turn

use super::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default chat model used when nothing is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Identifier of a chat model (Value Object)
///
/// The orchestration engine never inspects the model beyond its name;
/// the gateway adapter maps it onto whatever the endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Model(String);

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Model {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidModel(
                "model name cannot be empty".to_string(),
            ));
        }
        Ok(Self::new(trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        assert_eq!(Model::default().as_str(), "gpt-4o");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let model: Model = "  gpt-4o-mini ".parse().unwrap();
        assert_eq!(model.to_string(), "gpt-4o-mini");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert!("   ".parse::<Model>().is_err());
    }
}
