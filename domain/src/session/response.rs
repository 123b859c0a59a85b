//! Structured model responses: text plus tool-call requests.

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One block of a model response.
///
/// ```
/// use arkcutt_domain::session::response::ContentBlock;
///
/// let block = ContentBlock::ToolUse {
///     id: "call_1".to_string(),
///     name: "getDeliveryInfo".to_string(),
///     input: [("urgency".to_string(), serde_json::json!("express"))]
///         .into_iter().collect(),
/// };
/// assert!(block.as_text().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },

    /// A tool call request; `id` correlates the later tool result.
    ToolUse {
        id: String,
        name: String,
        input: HashMap<String, serde_json::Value>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::ToolUse { .. } => None,
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    /// Tools were requested; results must be sent back before the model continues
    ToolUse,
    MaxTokens,
    Other(String),
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason`.
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "stop" => StopReason::EndTurn,
            "tool_calls" | "function_call" => StopReason::ToolUse,
            "length" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// A model response: text blocks and/or tool-use blocks, in order
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    pub model: Option<String>,
}

impl LlmResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// Response requesting the given tool calls (and no text).
    pub fn from_tool_calls(calls: impl IntoIterator<Item = ToolCall>) -> Self {
        let content = calls
            .into_iter()
            .enumerate()
            .map(|(i, call)| ContentBlock::ToolUse {
                id: call.native_id.unwrap_or_else(|| format!("call_{}", i)),
                name: call.tool_name,
                input: call.arguments,
            })
            .collect();
        Self {
            content,
            stop_reason: Some(StopReason::ToolUse),
            model: None,
        }
    }

    /// All text blocks, concatenated
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("")
    }

    /// Tool-use blocks as calls, in response order
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => {
                    Some(ToolCall::from_native(id, name, input.clone()))
                }
                ContentBlock::Text { .. } => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}
