//! Infrastructure layer for arkcutt
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the chat model gateway, the HTTP clients of
//! the quoting services, the tool handlers, material catalogs,
//! configuration file loading and the JSONL conversation log.

pub mod catalog;
pub mod config;
pub mod llm;
pub mod logging;
pub mod services;
pub mod tools;

// Re-export commonly used types
pub use catalog::{RemoteMaterialCatalog, StaticMaterialCatalog};
pub use config::{CatalogSource, ConfigLoader, ConfigValidationError, FileConfig};
pub use llm::OpenAiGateway;
pub use logging::JsonlConversationLogger;
pub use services::{DesignGeneratorClient, DxfAnalyzerClient, PricingClient, ServiceError};
pub use tools::{
    JsonSchemaToolConverter, QuoteServices, ToolInvoker, ToolRegistry, quote_tool_registry,
};
