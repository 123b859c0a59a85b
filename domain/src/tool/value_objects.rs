//! Tool domain value objects: the uniform result envelope
//!
//! Every tool call, whether it ran, failed validation, or was refused by the
//! workflow guard, ends up as exactly one [`ToolResult`] in the turn history.
//!
//! | Kind | Produced by | Fatal? |
//! |------|-------------|--------|
//! | `ValidationError` | argument validation | No |
//! | `PreconditionNotMet` | workflow guard denial | No |
//! | `ExecutionFailure` | collaborator failure, panic, time-out | No |

use serde::{Deserialize, Serialize};

/// Classification of a failed tool call.
///
/// Serialized with the exact variant names since the model reads them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    ValidationError,
    PreconditionNotMet,
    ExecutionFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ValidationError => "ValidationError",
            ErrorKind::PreconditionNotMet => "PreconditionNotMet",
            ErrorKind::ExecutionFailure => "ExecutionFailure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error descriptor attached to a failed [`ToolResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    pub kind: ErrorKind,
    /// Human-readable message
    pub message: String,
    /// Diagnostic detail (upstream status, body, panic text)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ToolError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<serde_json::Value>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ValidationError, message)
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PreconditionNotMet, message)
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExecutionFailure, message)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for ToolError {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Wall-clock duration of the handler call in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Outcome of one tool call.
///
/// Exactly one of `payload` / `error` is set, matching `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_name: String,
    pub success: bool,
    /// Normalized success payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

impl ToolResult {
    pub fn success(tool_name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            payload: Some(payload),
            error: None,
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            payload: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    /// Body sent back to the model as the tool message content.
    ///
    /// Success payloads are wrapped as `{"success": true, ...payload}`,
    /// failures as `{"success": false, "error": {kind, message, detail}}`.
    pub fn to_model_output(&self) -> serde_json::Value {
        match (&self.payload, &self.error) {
            (Some(serde_json::Value::Object(map)), _) if self.success => {
                let mut out = serde_json::Map::with_capacity(map.len() + 1);
                out.insert("success".to_string(), serde_json::Value::Bool(true));
                for (k, v) in map {
                    out.insert(k.clone(), v.clone());
                }
                serde_json::Value::Object(out)
            }
            (Some(other), _) if self.success => serde_json::json!({
                "success": true,
                "data": other,
            }),
            (_, Some(error)) => serde_json::json!({
                "success": false,
                "error": error,
            }),
            _ => serde_json::json!({ "success": self.success }),
        }
    }
}
