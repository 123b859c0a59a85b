//! Application layer for arkcutt
//!
//! Use cases, port definitions, and application configuration.
//! Depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_MAX_STEPS, TurnConfig};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway, LlmSession, ToolResultMessage},
    material_catalog::{CatalogError, MaterialCatalog},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
    turn_progress::{ChannelTurnProgress, NoTurnProgress, TurnEvent, TurnProgressNotifier},
};
pub use use_cases::run_turn::{
    RunTurnInput, RunTurnOutput, RunTurnUseCase, TRANSPORT_FAILURE_MESSAGE, TurnError,
    TurnRequest,
};
