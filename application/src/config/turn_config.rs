//! Turn parameters: step-controller loop control.

use arkcutt_domain::Model;
use serde::{Deserialize, Serialize};

/// Default step ceiling for one user turn.
pub const DEFAULT_MAX_STEPS: usize = 6;

/// Loop control for [`RunTurnUseCase`](crate::use_cases::run_turn::RunTurnUseCase).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnConfig {
    /// Chat model driving the turn.
    pub model: Model,
    /// Hard ceiling on model requests per turn.
    pub max_steps: usize,
    /// Dispatch the calls of one batch concurrently.
    pub parallel_tool_calls: bool,
    /// Overrides the built-in assistant prompt when set.
    pub system_prompt: Option<String>,
}

impl Default for TurnConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            max_steps: DEFAULT_MAX_STEPS,
            parallel_tool_calls: true,
            system_prompt: None,
        }
    }
}

impl TurnConfig {
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    pub fn with_max_steps(mut self, max: usize) -> Self {
        self.max_steps = max;
        self
    }

    pub fn with_parallel_tool_calls(mut self, parallel: bool) -> Self {
        self.parallel_tool_calls = parallel;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }
}
