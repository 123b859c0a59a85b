//! Application-level configuration.
//!
//! - [`TurnConfig`]: step-controller loop control (model, ceiling, parallelism)

pub mod turn_config;

pub use turn_config::{DEFAULT_MAX_STEPS, TurnConfig};
