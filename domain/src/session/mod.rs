//! Conversation domain.
//!
//! - [`entities::Message`]: a single message, optionally carrying attachments
//! - [`response::LlmResponse`]: a model reply mixing text and tool calls

pub mod entities;
pub mod response;
