//! Type definitions for the RunTurn use case.

use crate::config::TurnConfig;
use crate::ports::llm_gateway::GatewayError;
use arkcutt_domain::{History, Message, TerminationReason};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Generic message shown to the caller on a transport failure.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "An error occurred while processing your request";

/// Fatal turn errors.
///
/// Tool-level failures never end up here; they are recorded in the history.
#[derive(Error, Debug)]
pub enum TurnError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),

    #[error("Turn cancelled")]
    Cancelled,
}

impl TurnError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TurnError::Cancelled)
    }

    /// Structured error body returned to the caller.
    pub fn payload(&self) -> serde_json::Value {
        serde_json::json!({
            "kind": "TransportFailure",
            "error": TRANSPORT_FAILURE_MESSAGE,
            "detail": self.to_string(),
        })
    }
}

/// Incoming turn request, as posted by a chat front-end
#[derive(Debug, Clone, Deserialize)]
pub struct TurnRequest {
    pub messages: Vec<Message>,
}

impl TurnRequest {
    /// Parse and check a JSON request body.
    pub fn from_json(body: &str) -> Result<Self, TurnError> {
        let request: TurnRequest = serde_json::from_str(body)
            .map_err(|e| TurnError::InvalidRequest(format!("malformed request body: {}", e)))?;
        if request.messages.is_empty() {
            return Err(TurnError::InvalidRequest(
                "request must contain at least one message".to_string(),
            ));
        }
        Ok(request)
    }
}

/// Input for the RunTurn use case
#[derive(Debug, Clone)]
pub struct RunTurnInput {
    /// Conversation so far, oldest first
    pub messages: Vec<Message>,
    pub config: TurnConfig,
}

impl RunTurnInput {
    pub fn new(messages: Vec<Message>, config: TurnConfig) -> Self {
        Self { messages, config }
    }

    pub fn from_request(request: TurnRequest, config: TurnConfig) -> Self {
        Self::new(request.messages, config)
    }
}

/// Output from the RunTurn use case
#[derive(Debug, Clone, Serialize)]
pub struct RunTurnOutput {
    /// Model text produced during the turn, in order
    pub text: String,
    pub history: History,
    /// Number of model requests made
    pub steps: usize,
    pub termination: TerminationReason,
}

impl RunTurnOutput {
    /// Whether any tool call of the turn failed
    pub fn has_failures(&self) -> bool {
        self.history.entries().iter().any(|e| !e.result.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_json() {
        let request =
            TurnRequest::from_json(r#"{"messages": [{"role": "user", "content": "Hola"}]}"#)
                .unwrap();
        assert_eq!(request.messages.len(), 1);
    }

    #[test]
    fn test_request_rejects_malformed_json() {
        let err = TurnRequest::from_json("{not json").unwrap_err();
        assert!(matches!(err, TurnError::InvalidRequest(_)));
    }

    #[test]
    fn test_request_rejects_empty_messages() {
        let err = TurnRequest::from_json(r#"{"messages": []}"#).unwrap_err();
        assert!(err.to_string().contains("at least one message"));
    }

    #[test]
    fn test_payload_shape() {
        let err = TurnError::GatewayError(GatewayError::Timeout);
        let payload = err.payload();
        assert_eq!(payload["kind"], "TransportFailure");
        assert_eq!(payload["error"], TRANSPORT_FAILURE_MESSAGE);
        assert_eq!(payload["detail"], "Gateway error: Timeout");
    }
}
