//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: identifier of the chat model driving a turn
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
