//! Chat model adapter for OpenAI-compatible endpoints
//!
//! [`OpenAiGateway`] implements the `LlmGateway` port over
//! `POST {base_url}/chat/completions`. Each session replays its own
//! transcript, so the tool loop can answer pending calls with
//! `role: "tool"` messages.

mod gateway;
mod session;
mod types;

pub use gateway::OpenAiGateway;
pub use session::OpenAiSession;
