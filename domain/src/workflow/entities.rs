//! Step state of a single turn

use serde::{Deserialize, Serialize};

use super::history::History;
use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolResult;

/// Phase of the step controller's state machine
///
/// `Thinking → Executing → Evaluating → (Thinking | Done)`, or
/// `Thinking → Done` when the model answers with text only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPhase {
    Thinking,
    Executing,
    Evaluating,
    Done,
}

impl StepPhase {
    pub fn as_str(&self) -> &str {
        match self {
            StepPhase::Thinking => "thinking",
            StepPhase::Executing => "executing",
            StepPhase::Evaluating => "evaluating",
            StepPhase::Done => "done",
        }
    }
}

impl std::fmt::Display for StepPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a turn reached `Done`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TerminationReason {
    /// The model answered without requesting tools
    TextResponse,
    /// A stop policy fired; `policy` names the one that did
    StopPolicy { policy: String },
    /// The configured step ceiling was reached
    StepCeiling,
}

/// Mutable state of one turn
///
/// Created when a user turn starts and discarded once the turn is done.
#[derive(Debug, Clone)]
pub struct StepState {
    step: usize,
    max_steps: usize,
    phase: StepPhase,
    history: History,
    termination: Option<TerminationReason>,
}

impl StepState {
    pub fn new(max_steps: usize) -> Self {
        Self {
            step: 0,
            max_steps,
            phase: StepPhase::Thinking,
            history: History::new(),
            termination: None,
        }
    }

    /// Advance the counter for a new model request.
    ///
    /// Returns `false` once the ceiling is reached or the turn is done;
    /// the counter never goes past `max_steps`.
    pub fn begin_step(&mut self) -> bool {
        if self.is_done() || self.step >= self.max_steps {
            return false;
        }
        self.step += 1;
        self.phase = StepPhase::Thinking;
        true
    }

    pub fn begin_execution(&mut self) {
        self.phase = StepPhase::Executing;
    }

    /// Append a result for the current step.
    pub fn record(&mut self, request: ToolCall, result: ToolResult) {
        self.history.append(self.step, request, result);
    }

    pub fn begin_evaluation(&mut self) {
        self.phase = StepPhase::Evaluating;
    }

    pub fn finish(&mut self, reason: TerminationReason) {
        self.phase = StepPhase::Done;
        self.termination = Some(reason);
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn at_ceiling(&self) -> bool {
        self.step >= self.max_steps
    }

    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == StepPhase::Done
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn termination(&self) -> Option<&TerminationReason> {
        self.termination.as_ref()
    }

    /// Consume the state, yielding the history and termination reason.
    pub fn into_parts(self) -> (History, usize, Option<TerminationReason>) {
        (self.history, self.step, self.termination)
    }
}
