//! Turn workflow: history, ordering rules, stop conditions and step state
//!
//! Everything here is synchronous and side-effect free. The step
//! controller in the application layer drives these types.

pub mod entities;
pub mod guard;
pub mod history;
pub mod stop_policy;

pub use entities::{StepPhase, StepState, TerminationReason};
pub use guard::{GuardDecision, RequiresPriorSuccess, WorkflowGuard, WorkflowRule};
pub use history::{History, HistoryEntry};
pub use stop_policy::{AllSucceeded, AnyOf, StepCountIs, StopPolicy, quote_completion_policy};
