//! Presentation layer for arkcutt
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the interactive chat interface.

pub mod chat;
pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use chat::{ChatRepl, load_attachment};
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::{ConsoleFormatter, QuoteSummary};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
