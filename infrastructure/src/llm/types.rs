//! OpenAI-compatible Chat Completions wire types and conversions

use arkcutt_application::ports::llm_gateway::{GatewayError, ToolResultMessage};
use arkcutt_domain::{ContentBlock, LlmResponse, Message, StopReason};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ChatCompletionTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ChatCompletionMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ChatCompletionToolCall>>,
}

impl ChatCompletionMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.to_string()),
            tool_call_id: None,
            tool_calls: None,
        }
    }

    pub fn tool_result(result: &ToolResultMessage) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(result.output.clone()),
            tool_call_id: Some(result.tool_use_id.clone()),
            tool_calls: None,
        }
    }

    /// Replay a model response into the transcript.
    pub fn assistant(response: &LlmResponse) -> Self {
        let tool_calls: Vec<ChatCompletionToolCall> = response
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => Some(ChatCompletionToolCall {
                    id: id.clone(),
                    call_type: "function".to_string(),
                    function: ChatCompletionToolCallFunction {
                        name: name.clone(),
                        arguments: Value::Object(
                            input.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                        )
                        .to_string(),
                    },
                }),
                ContentBlock::Text { .. } => None,
            })
            .collect();

        let text = response.text_content();
        Self {
            role: "assistant".to_string(),
            content: if text.is_empty() && !tool_calls.is_empty() {
                None
            } else {
                Some(text)
            },
            tool_call_id: None,
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
        }
    }
}

impl From<&Message> for ChatCompletionMessage {
    fn from(msg: &Message) -> Self {
        Self {
            role: msg.role.as_str().to_string(),
            content: Some(msg.rendered_content()),
            tool_call_id: None,
            tool_calls: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatCompletionTool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: ChatCompletionFunction,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatCompletionFunction {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: Value,
}

impl ChatCompletionTool {
    /// Wrap a `{name, description, input_schema}` tool schema.
    pub fn from_schema(schema: &Value) -> Result<Self, GatewayError> {
        let name = schema
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::Other("tool schema without a name".to_string()))?;
        Ok(Self {
            tool_type: "function".to_string(),
            function: ChatCompletionFunction {
                name: name.to_string(),
                description: schema
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                parameters: schema
                    .get("input_schema")
                    .cloned()
                    .unwrap_or_else(|| serde_json::json!({"type": "object", "properties": {}})),
            },
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    pub choices: Vec<ChatCompletionChoice>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionChoice {
    pub message: ChatCompletionResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponseMessage {
    pub content: Option<String>,
    pub tool_calls: Option<Vec<ChatCompletionToolCall>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ChatCompletionToolCall {
    /// Some compatible servers omit it; filled in on conversion
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: ChatCompletionToolCallFunction,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct ChatCompletionToolCallFunction {
    pub name: String,
    /// JSON-encoded arguments object
    pub arguments: String,
}

/// Parse tool-call arguments.
///
/// Anything that is not a JSON object becomes an empty argument map; the
/// validator then reports the missing fields back to the model.
pub(crate) fn parse_arguments(tool_name: &str, raw: &str) -> HashMap<String, Value> {
    if raw.trim().is_empty() {
        return HashMap::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map.into_iter().collect(),
        Ok(other) => {
            warn!(tool = tool_name, arguments = %other, "Tool-call arguments are not an object");
            HashMap::new()
        }
        Err(e) => {
            warn!(tool = tool_name, error = %e, "Discarding malformed tool-call arguments");
            HashMap::new()
        }
    }
}

/// Convert the first choice of a response into an [`LlmResponse`].
pub(crate) fn convert_response(
    response: ChatCompletionResponse,
) -> Result<LlmResponse, GatewayError> {
    let model = response.model;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::RequestFailed("No choices in response".to_string()))?;

    let mut content = Vec::new();
    if let Some(text) = choice.message.content
        && !text.is_empty()
    {
        content.push(ContentBlock::Text { text });
    }
    for (index, call) in choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .enumerate()
    {
        let id = if call.id.is_empty() {
            format!("call_{}", index)
        } else {
            call.id
        };
        content.push(ContentBlock::ToolUse {
            input: parse_arguments(&call.function.name, &call.function.arguments),
            id,
            name: call.function.name,
        });
    }

    let has_tool_calls = content
        .iter()
        .any(|b| matches!(b, ContentBlock::ToolUse { .. }));
    let stop_reason = match choice.finish_reason.as_deref() {
        Some(reason) => Some(StopReason::from_finish_reason(reason)),
        None if has_tool_calls => Some(StopReason::ToolUse),
        None => None,
    };

    Ok(LlmResponse {
        content,
        stop_reason,
        model,
    })
}
