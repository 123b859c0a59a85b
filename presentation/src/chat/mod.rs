//! Interactive chat module
//!
//! Provides a line-editor based chat with the quote assistant.

mod attachment;
mod repl;

pub use attachment::load_attachment;
pub use repl::{ChatCommand, ChatRepl};
