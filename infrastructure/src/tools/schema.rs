//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`]. Produces a provider-neutral
//! `{name, description, input_schema}` object per tool; the model gateway
//! wraps it into whatever envelope its endpoint expects.

use arkcutt_application::ports::tool_schema::ToolSchemaPort;
use arkcutt_domain::tool::entities::{ParamType, ToolDefinition, ToolParameter};
use serde_json::{Map, Value, json};

/// Maps each [`ParamType`] onto JSON Schema keywords:
///
/// | ParamType | Schema |
/// |-----------|--------|
/// | `String` | `type: string`, `minLength`, `maxLength` |
/// | `Number` | `type: number`, `minimum`/`exclusiveMinimum`, `maximum` |
/// | `Boolean` | `type: boolean` |
/// | `Enum` | `type: string`, `enum` |
/// | `Email` | `type: string`, `format: email` |
pub struct JsonSchemaToolConverter;

fn parameter_schema(param: &ToolParameter) -> Value {
    let mut prop = Map::new();
    prop.insert("type".to_string(), json!(param.param_type.json_type()));
    prop.insert("description".to_string(), json!(param.description));

    match &param.param_type {
        ParamType::String {
            min_length,
            max_length,
        } => {
            if let Some(min) = min_length {
                prop.insert("minLength".to_string(), json!(min));
            }
            if let Some(max) = max_length {
                prop.insert("maxLength".to_string(), json!(max));
            }
        }
        ParamType::Number {
            min,
            max,
            exclusive_min,
        } => {
            if let Some(min) = min {
                let key = if *exclusive_min {
                    "exclusiveMinimum"
                } else {
                    "minimum"
                };
                prop.insert(key.to_string(), json!(min));
            }
            if let Some(max) = max {
                prop.insert("maximum".to_string(), json!(max));
            }
        }
        ParamType::Enum { values } => {
            prop.insert("enum".to_string(), json!(values));
        }
        ParamType::Email => {
            prop.insert("format".to_string(), json!("email"));
        }
        ParamType::Boolean => {}
    }

    if let Some(default) = &param.default {
        prop.insert("default".to_string(), default.clone());
    }

    Value::Object(prop)
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let properties: Map<String, Value> = tool
            .parameters
            .iter()
            .map(|p| (p.name.clone(), parameter_schema(p)))
            .collect();
        let required: Vec<&str> = tool
            .parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
            }
        })
    }
}
