//! LLM Gateway port
//!
//! Defines the interface for communicating with the chat model.

use arkcutt_domain::{LlmResponse, Message, Model};
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Result of one tool call, sent back to the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResultMessage {
    /// Id of the tool-use block this answers
    pub tool_use_id: String,
    pub tool_name: String,
    /// JSON-encoded result envelope
    pub output: String,
    pub is_error: bool,
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Create a new session with a system prompt
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active LLM session
///
/// The session keeps its own transcript: after `send_with_tools` the
/// assistant's tool requests are remembered so `send_tool_results` can
/// continue the same exchange.
#[async_trait]
pub trait LlmSession: Send + Sync {
    fn model(&self) -> &Model;

    /// Send the conversation so far with the tool schemas the model may use.
    async fn send_with_tools(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError>;

    /// Answer the pending tool calls of the previous response.
    async fn send_tool_results(
        &self,
        results: &[ToolResultMessage],
    ) -> Result<LlmResponse, GatewayError>;
}
