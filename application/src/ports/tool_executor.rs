//! Tool Executor port
//!
//! Validates and executes one tool call, always yielding a result envelope.

use arkcutt_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};
use async_trait::async_trait;

/// Port for tool execution
///
/// `execute` never fails: validation errors, collaborator failures and
/// panics inside handlers all come back as unsuccessful [`ToolResult`]s.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().contains(name)
    }

    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Execute a tool call asynchronously
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
