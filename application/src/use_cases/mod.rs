//! Use cases (application services)

pub mod run_turn;
pub(crate) mod shared;
