//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Registering a second tool under an existing name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Tool '{0}' is already registered")]
pub struct DuplicateToolError(pub String);

/// Type and constraints of a single tool parameter.
///
/// Bounds are inclusive. `None` means unbounded on that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParamType {
    /// Free text, length measured in characters
    String {
        min_length: Option<usize>,
        max_length: Option<usize>,
    },
    /// Any JSON number. `exclusive_min` turns the lower bound into `>`.
    Number {
        min: Option<f64>,
        max: Option<f64>,
        #[serde(default)]
        exclusive_min: bool,
    },
    Boolean,
    /// One of a fixed set of string literals
    Enum { values: Vec<String> },
    /// A string that must look like an e-mail address
    Email,
}

impl ParamType {
    /// Unbounded string
    pub fn string() -> Self {
        ParamType::String {
            min_length: None,
            max_length: None,
        }
    }

    /// String with inclusive character-count bounds
    pub fn string_len(min: usize, max: usize) -> Self {
        ParamType::String {
            min_length: Some(min),
            max_length: Some(max),
        }
    }

    /// Non-empty string
    pub fn non_empty_string() -> Self {
        ParamType::String {
            min_length: Some(1),
            max_length: None,
        }
    }

    pub fn number() -> Self {
        ParamType::Number {
            min: None,
            max: None,
            exclusive_min: false,
        }
    }

    pub fn number_range(min: f64, max: f64) -> Self {
        ParamType::Number {
            min: Some(min),
            max: Some(max),
            exclusive_min: false,
        }
    }

    pub fn number_min(min: f64) -> Self {
        ParamType::Number {
            min: Some(min),
            max: None,
            exclusive_min: false,
        }
    }

    /// Strictly greater than zero
    pub fn positive_number() -> Self {
        ParamType::Number {
            min: Some(0.0),
            max: None,
            exclusive_min: true,
        }
    }

    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ParamType::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// JSON Schema primitive type name
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamType::String { .. } | ParamType::Enum { .. } | ParamType::Email => "string",
            ParamType::Number { .. } => "number",
            ParamType::Boolean => "boolean",
        }
    }
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description shown to the model
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Type and constraints
    pub param_type: ParamType,
    /// Value used when an optional parameter is absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: ParamType::string(),
            default: None,
        }
    }

    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, true)
    }

    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, false)
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }

    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default = Some(value.into());
        self
    }
}

/// Definition of a tool the assistant may call
///
/// The execution side lives behind [`ToolHandler`](super::handler::ToolHandler);
/// the definition itself is pure data and never changes once registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "analyzeDXF")
    pub name: String,
    /// Description shown to the model
    pub description: String,
    /// Parameter specifications, in declaration order
    pub parameters: Vec<ToolParameter>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Name-keyed set of tool definitions
///
/// Iteration order is sorted by name so schemas sent to the model are stable.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: BTreeMap<String, ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition, refusing to overwrite an existing name.
    pub fn register(&mut self, tool: ToolDefinition) -> Result<(), DuplicateToolError> {
        if self.tools.contains_key(&tool.name) {
            return Err(DuplicateToolError(tool.name));
        }
        self.tools.insert(tool.name.clone(), tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A tool call requested by the model, not yet validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub tool_name: String,
    /// Raw arguments as produced by the model
    pub arguments: HashMap<String, serde_json::Value>,
    /// Model-assigned call id used to correlate the result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native_id: Option<String>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: HashMap::new(),
            native_id: None,
        }
    }

    /// Build a call from a native tool-use block.
    pub fn from_native(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            tool_name: name.into(),
            arguments,
            native_id: Some(id.into()),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_native_id(mut self, id: impl Into<String>) -> Self {
        self.native_id = Some(id.into());
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("analyzeDXF", "Analyze a DXF file").with_parameter(
            ToolParameter::required("filename", "DXF file name")
                .with_type(ParamType::non_empty_string()),
        );

        assert_eq!(tool.name, "analyzeDXF");
        assert_eq!(tool.parameters.len(), 1);
        assert!(tool.parameter("filename").unwrap().required);
        assert!(tool.parameter("missing").is_none());
    }

    #[test]
    fn test_tool_spec_register_rejects_duplicates() {
        let mut spec = ToolSpec::new();
        spec.register(ToolDefinition::new("analyzeDXF", "first"))
            .unwrap();

        let err = spec
            .register(ToolDefinition::new("analyzeDXF", "second"))
            .unwrap_err();
        assert_eq!(err, DuplicateToolError("analyzeDXF".to_string()));

        // The original definition survives
        assert_eq!(spec.get("analyzeDXF").unwrap().description, "first");
        assert_eq!(spec.len(), 1);
    }

    #[test]
    fn test_tool_spec_names_are_sorted() {
        let mut spec = ToolSpec::new();
        spec.register(ToolDefinition::new("getDeliveryInfo", "d")).unwrap();
        spec.register(ToolDefinition::new("analyzeDXF", "a")).unwrap();
        spec.register(ToolDefinition::new("calculateQuote", "c")).unwrap();

        let names: Vec<&str> = spec.names().collect();
        assert_eq!(names, vec!["analyzeDXF", "calculateQuote", "getDeliveryInfo"]);
    }

    #[test]
    fn test_param_type_json_type() {
        assert_eq!(ParamType::string_len(3, 500).json_type(), "string");
        assert_eq!(ParamType::number_range(0.0, 3000.0).json_type(), "number");
        assert_eq!(ParamType::positive_number().json_type(), "number");
        assert_eq!(ParamType::enumeration(["a", "b"]).json_type(), "string");
        assert_eq!(ParamType::Email.json_type(), "string");
        assert_eq!(ParamType::Boolean.json_type(), "boolean");
    }

    #[test]
    fn test_tool_call_from_native() {
        let call = ToolCall::from_native(
            "call_1",
            "analyzeDXF",
            [("filename".to_string(), serde_json::json!("box.dxf"))]
                .into_iter()
                .collect(),
        );

        assert_eq!(call.tool_name, "analyzeDXF");
        assert_eq!(call.native_id.as_deref(), Some("call_1"));
        assert_eq!(call.get_string("filename"), Some("box.dxf"));
    }
}
