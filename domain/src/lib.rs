//! Domain layer for arkcutt
//!
//! Pure business logic for the laser-cutting quote assistant. No I/O and
//! no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tools
//!
//! Each capability the assistant may invoke is a named tool with a typed
//! parameter contract ([`ToolDefinition`]). Raw calls from the model are
//! validated into [`ValidatedArgs`] and every call ends as a [`ToolResult`].
//!
//! ## Workflow
//!
//! A turn accumulates an append-only [`History`]. The [`WorkflowGuard`]
//! enforces ordering (no quote before a successful file analysis) and a
//! [`StopPolicy`] decides when the tool loop is complete.

pub mod core;
pub mod prompt;
pub mod quote;
pub mod session;
pub mod tool;
pub mod workflow;

// Re-export commonly used types
pub use core::{error::DomainError, model::Model};
pub use prompt::AssistantPromptTemplate;
pub use session::{
    entities::{Attachment, Message, Role},
    response::{ContentBlock, LlmResponse, StopReason},
};
pub use tool::{
    entities::{DuplicateToolError, ParamType, ToolCall, ToolDefinition, ToolParameter, ToolSpec},
    handler::{HandlerError, ToolHandler},
    validation::{DefaultToolValidator, ToolValidator, ValidatedArgs, ValidationError},
    value_objects::{ErrorKind, ToolError, ToolResult, ToolResultMetadata},
};
pub use workflow::{
    AllSucceeded, AnyOf, GuardDecision, History, HistoryEntry, RequiresPriorSuccess, StepCountIs,
    StepPhase, StepState, StopPolicy, TerminationReason, WorkflowGuard, WorkflowRule,
    quote_completion_policy,
};
