//! Conversation transcript logging.
//!
//! Provides [`JsonlConversationLogger`], the JSONL implementation of the
//! [`ConversationLogger`](arkcutt_application::ports::conversation_logger::ConversationLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlConversationLogger;
