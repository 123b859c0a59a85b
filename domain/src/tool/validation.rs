//! Argument validation for tool calls
//!
//! Pure domain logic: a [`ToolCall`] is checked against its
//! [`ToolDefinition`] and either rejected with a [`ValidationError`] or
//! turned into [`ValidatedArgs`] with defaults applied. No I/O happens here.

use super::entities::{ParamType, ToolCall, ToolDefinition, ToolParameter};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Why an argument bag was rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Missing required parameter '{field}'")]
    MissingField { field: String },

    #[error("Parameter '{field}' must be of type {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    #[error("Parameter '{field}' must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: String,
        value: f64,
        min: String,
        max: String,
    },

    #[error("Parameter '{field}' must have between {min} and {max} characters (got {len})")]
    LengthOutOfBounds {
        field: String,
        len: usize,
        min: String,
        max: String,
    },

    #[error("Parameter '{field}' must be one of [{allowed}] (got '{value}')")]
    NotInEnum {
        field: String,
        value: String,
        allowed: String,
    },

    #[error("Parameter '{field}' must be a valid e-mail address")]
    InvalidEmail { field: String },
}

impl ValidationError {
    /// Name of the offending field, if the error concerns one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::UnknownTool(_) => None,
            ValidationError::MissingField { field }
            | ValidationError::WrongType { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::LengthOutOfBounds { field, .. }
            | ValidationError::NotInEnum { field, .. }
            | ValidationError::InvalidEmail { field } => Some(field),
        }
    }
}

/// Arguments that passed validation, with defaults filled in.
///
/// Only declared parameters survive; extra keys sent by the model are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedArgs {
    values: BTreeMap<String, Value>,
}

impl ValidatedArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(Value::as_bool)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.values.clone().into_iter().collect())
    }
}

/// Validator for tool calls
pub trait ToolValidator {
    fn validate(
        &self,
        call: &ToolCall,
        definition: &ToolDefinition,
    ) -> Result<ValidatedArgs, ValidationError>;
}

/// Default implementation of ToolValidator
///
/// Parameters are checked in declaration order and the first violation wins.
/// An explicit JSON `null` counts as absent.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(
        &self,
        call: &ToolCall,
        definition: &ToolDefinition,
    ) -> Result<ValidatedArgs, ValidationError> {
        let mut values = BTreeMap::new();

        for param in &definition.parameters {
            match call.arguments.get(&param.name).filter(|v| !v.is_null()) {
                Some(value) => {
                    check_value(param, value)?;
                    values.insert(param.name.clone(), value.clone());
                }
                None if param.required => {
                    return Err(ValidationError::MissingField {
                        field: param.name.clone(),
                    });
                }
                None => {
                    if let Some(default) = &param.default {
                        values.insert(param.name.clone(), default.clone());
                    }
                }
            }
        }

        Ok(ValidatedArgs { values })
    }
}

fn check_value(param: &ToolParameter, value: &Value) -> Result<(), ValidationError> {
    let field = || param.name.clone();
    let wrong_type = || ValidationError::WrongType {
        field: field(),
        expected: param.param_type.json_type(),
    };

    match &param.param_type {
        ParamType::String {
            min_length,
            max_length,
        } => {
            let s = value.as_str().ok_or_else(wrong_type)?;
            let len = s.chars().count();
            let too_short = min_length.is_some_and(|min| len < min);
            let too_long = max_length.is_some_and(|max| len > max);
            if too_short || too_long {
                return Err(ValidationError::LengthOutOfBounds {
                    field: field(),
                    len,
                    min: bound(*min_length),
                    max: bound(*max_length),
                });
            }
        }
        ParamType::Number {
            min,
            max,
            exclusive_min,
        } => {
            let n = value.as_f64().ok_or_else(wrong_type)?;
            let below = min.is_some_and(|m| if *exclusive_min { n <= m } else { n < m });
            if below || max.is_some_and(|m| n > m) {
                let min = match min {
                    Some(m) if *exclusive_min => format!("more than {m}"),
                    other => bound(*other),
                };
                return Err(ValidationError::OutOfRange {
                    field: field(),
                    value: n,
                    min,
                    max: bound(*max),
                });
            }
        }
        ParamType::Boolean => {
            value.as_bool().ok_or_else(wrong_type)?;
        }
        ParamType::Enum { values } => {
            let s = value.as_str().ok_or_else(wrong_type)?;
            if !values.iter().any(|v| v == s) {
                return Err(ValidationError::NotInEnum {
                    field: field(),
                    value: s.to_string(),
                    allowed: values.join(", "),
                });
            }
        }
        ParamType::Email => {
            let s = value.as_str().ok_or_else(wrong_type)?;
            if !looks_like_email(s) {
                return Err(ValidationError::InvalidEmail { field: field() });
            }
        }
    }

    Ok(())
}

fn bound<T: std::fmt::Display>(b: Option<T>) -> String {
    b.map(|v| v.to_string()).unwrap_or_else(|| "any".to_string())
}

fn looks_like_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prompt_tool() -> ToolDefinition {
        ToolDefinition::new("generateDXFFromPrompt", "Generate a design")
            .with_parameter(
                ToolParameter::required("prompt", "Description")
                    .with_type(ParamType::string_len(3, 500)),
            )
            .with_parameter(
                ToolParameter::optional("width", "Width in mm")
                    .with_type(ParamType::number_range(0.0, 3000.0)),
            )
            .with_parameter(
                ToolParameter::optional("material", "Material hint")
                    .with_type(ParamType::enumeration(["wood", "acrylic"])),
            )
            .with_parameter(
                ToolParameter::optional("use_ai_enhancement", "Enhance prompt")
                    .with_type(ParamType::Boolean)
                    .with_default(true),
            )
    }

    fn validate(call: ToolCall) -> Result<ValidatedArgs, ValidationError> {
        DefaultToolValidator.validate(&call, &prompt_tool())
    }

    #[test]
    fn test_prompt_too_short() {
        let err = validate(ToolCall::new("generateDXFFromPrompt").with_arg("prompt", "ab"))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::LengthOutOfBounds { len: 2, .. }
        ));
    }

    #[test]
    fn test_prompt_too_long() {
        let long = "x".repeat(600);
        let err = validate(ToolCall::new("generateDXFFromPrompt").with_arg("prompt", long))
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::LengthOutOfBounds { len: 600, .. }
        ));
        assert_eq!(err.field(), Some("prompt"));
    }

    #[test]
    fn test_prompt_bounds_are_inclusive() {
        assert!(validate(ToolCall::new("generateDXFFromPrompt").with_arg("prompt", "box")).is_ok());
        let max = "y".repeat(500);
        assert!(validate(ToolCall::new("generateDXFFromPrompt").with_arg("prompt", max)).is_ok());
    }

    #[test]
    fn test_missing_required_field() {
        let err = validate(ToolCall::new("generateDXFFromPrompt")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "prompt".to_string()
            }
        );
    }

    #[test]
    fn test_null_counts_as_missing() {
        let err = validate(ToolCall::new("generateDXFFromPrompt").with_arg("prompt", Value::Null))
            .unwrap_err();
        assert!(matches!(err, ValidationError::MissingField { .. }));
    }

    #[test]
    fn test_number_out_of_range() {
        let err = validate(
            ToolCall::new("generateDXFFromPrompt")
                .with_arg("prompt", "a square")
                .with_arg("width", 3500),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_number_rejects_string() {
        let err = validate(
            ToolCall::new("generateDXFFromPrompt")
                .with_arg("prompt", "a square")
                .with_arg("width", "100"),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ValidationError::WrongType {
                field: "width".to_string(),
                expected: "number"
            }
        );
    }

    #[test]
    fn test_exclusive_minimum() {
        let def = ToolDefinition::new("calculateQuote", "Quote").with_parameter(
            ToolParameter::required("area_mm2", "Area").with_type(ParamType::positive_number()),
        );
        let check = |area: f64| {
            DefaultToolValidator
                .validate(&ToolCall::new("calculateQuote").with_arg("area_mm2", area), &def)
        };

        assert!(check(0.5).is_ok());
        assert!(matches!(
            check(0.0).unwrap_err(),
            ValidationError::OutOfRange { .. }
        ));
    }

    #[test]
    fn test_enum_rejects_unknown_literal() {
        let err = validate(
            ToolCall::new("generateDXFFromPrompt")
                .with_arg("prompt", "a square")
                .with_arg("material", "granite"),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::NotInEnum { .. }));
    }

    #[test]
    fn test_defaults_applied_and_unknown_fields_dropped() {
        let args = validate(
            ToolCall::new("generateDXFFromPrompt")
                .with_arg("prompt", "a square")
                .with_arg("colour", "red"),
        )
        .unwrap();

        assert_eq!(args.get_bool("use_ai_enhancement"), Some(true));
        assert_eq!(args.get_str("prompt"), Some("a square"));
        assert!(!args.contains("colour"));
        assert!(!args.contains("width"));
    }

    #[test]
    fn test_email_validation() {
        let def = ToolDefinition::new("calculateQuote", "Quote").with_parameter(
            ToolParameter::required("client_email", "E-mail").with_type(ParamType::Email),
        );
        let check = |email: &str| {
            DefaultToolValidator
                .validate(&ToolCall::new("calculateQuote").with_arg("client_email", email), &def)
        };

        assert!(check("ana@example.com").is_ok());
        assert!(check("ana.example.com").is_err());
        assert!(check("ana@example").is_err());
        assert!(check("ana @example.com").is_err());
        assert!(check("@example.com").is_err());
    }

    #[test]
    fn test_validated_args_to_json() {
        let args = ValidatedArgs::new().with("prompt", "box").with("width", 10);
        assert_eq!(args.to_json(), json!({"prompt": "box", "width": 10}));
    }
}
