//! Tool domain module
//!
//! Pure definitions for the assistant's tools: what each tool accepts,
//! how arguments are validated, and the uniform result envelope.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ValidatedArgs│───▶│ ToolResult   │
//! │ (registry)   │    │ (raw, model) │    │ (defaults)   │    │ (envelope)   │
//! └──────────────┘    └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! The async execution port lives in the application layer; concrete
//! handlers that talk to the HTTP collaborators live in infrastructure.

pub mod entities;
pub mod handler;
pub mod names;
pub mod validation;
pub mod value_objects;

pub use entities::{DuplicateToolError, ParamType, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use handler::{HandlerError, ToolHandler};
pub use validation::{DefaultToolValidator, ToolValidator, ValidatedArgs, ValidationError};
pub use value_objects::{ErrorKind, ToolError, ToolResult, ToolResultMetadata};
