//! Port for structured conversation logging.
//!
//! Separate from `tracing`: tracing carries human-readable diagnostics,
//! while this port records the turn transcript (messages, tool calls,
//! guard decisions, results) in a machine-readable form such as JSONL.

use serde_json::Value;

/// A structured conversation event.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "tool_call", "tool_denied", "turn_complete").
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging conversation events.
///
/// Synchronous and infallible; a failed write must not disturb the turn.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
