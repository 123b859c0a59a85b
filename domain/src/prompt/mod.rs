//! Prompt domain

mod assistant;

pub use assistant::AssistantPromptTemplate;
