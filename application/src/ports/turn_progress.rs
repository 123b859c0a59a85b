//! Turn progress port.
//!
//! [`TurnProgressNotifier`] is an output port the presentation layer
//! implements to follow a turn as it runs. Every method has a no-op
//! default, so implementers override only what they display.
//!
//! [`ChannelTurnProgress`] forwards the same callbacks as [`TurnEvent`]s
//! over a tokio channel, for callers that consume events as a stream.

use arkcutt_domain::{StepPhase, TerminationReason, ToolCall, ToolResult};
use serde::Serialize;
use tokio::sync::mpsc;

pub trait TurnProgressNotifier: Send + Sync {
    /// Called when the step controller changes phase
    fn on_phase_change(&self, _step: usize, _phase: StepPhase) {}

    /// Called with each non-empty text reply from the model
    fn on_model_text(&self, _text: &str) {}

    /// Called before a permitted tool call is executed
    fn on_tool_call(&self, _step: usize, _call: &ToolCall) {}

    /// Called when the workflow guard refuses a call
    fn on_tool_denied(&self, _step: usize, _tool_name: &str, _reason: &str) {}

    /// Called once per call, in request order, after the batch settles
    fn on_tool_result(&self, _step: usize, _result: &ToolResult) {}

    /// Called once when the turn reaches `Done`
    fn on_turn_complete(&self, _steps: usize, _reason: &TerminationReason) {}
}

/// No-op implementation
pub struct NoTurnProgress;

impl TurnProgressNotifier for NoTurnProgress {}

/// A progress callback as data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TurnEvent {
    PhaseChanged {
        step: usize,
        phase: StepPhase,
    },
    ModelText {
        text: String,
    },
    ToolCall {
        step: usize,
        call: ToolCall,
    },
    ToolDenied {
        step: usize,
        tool_name: String,
        reason: String,
    },
    ToolResult {
        step: usize,
        result: ToolResult,
    },
    TurnComplete {
        steps: usize,
        termination: TerminationReason,
    },
}

/// Notifier that forwards every callback over an unbounded channel.
///
/// Send errors are ignored; a dropped receiver just stops the stream.
pub struct ChannelTurnProgress {
    tx: mpsc::UnboundedSender<TurnEvent>,
}

impl ChannelTurnProgress {
    pub fn new(tx: mpsc::UnboundedSender<TurnEvent>) -> Self {
        Self { tx }
    }

    /// Create a notifier and the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TurnEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn emit(&self, event: TurnEvent) {
        let _ = self.tx.send(event);
    }
}

impl TurnProgressNotifier for ChannelTurnProgress {
    fn on_phase_change(&self, step: usize, phase: StepPhase) {
        self.emit(TurnEvent::PhaseChanged { step, phase });
    }

    fn on_model_text(&self, text: &str) {
        self.emit(TurnEvent::ModelText {
            text: text.to_string(),
        });
    }

    fn on_tool_call(&self, step: usize, call: &ToolCall) {
        self.emit(TurnEvent::ToolCall {
            step,
            call: call.clone(),
        });
    }

    fn on_tool_denied(&self, step: usize, tool_name: &str, reason: &str) {
        self.emit(TurnEvent::ToolDenied {
            step,
            tool_name: tool_name.to_string(),
            reason: reason.to_string(),
        });
    }

    fn on_tool_result(&self, step: usize, result: &ToolResult) {
        self.emit(TurnEvent::ToolResult {
            step,
            result: result.clone(),
        });
    }

    fn on_turn_complete(&self, steps: usize, reason: &TerminationReason) {
        self.emit(TurnEvent::TurnComplete {
            steps,
            termination: reason.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_forwards_events_in_order() {
        let (progress, mut rx) = ChannelTurnProgress::channel();

        progress.on_phase_change(1, StepPhase::Thinking);
        progress.on_model_text("Analizando...");
        progress.on_turn_complete(1, &TerminationReason::TextResponse);

        assert_eq!(
            rx.try_recv().unwrap(),
            TurnEvent::PhaseChanged {
                step: 1,
                phase: StepPhase::Thinking
            }
        );
        assert!(matches!(rx.try_recv().unwrap(), TurnEvent::ModelText { .. }));
        assert!(matches!(
            rx.try_recv().unwrap(),
            TurnEvent::TurnComplete { steps: 1, .. }
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dropped_receiver_is_ignored() {
        let (progress, rx) = ChannelTurnProgress::channel();
        drop(rx);
        progress.on_model_text("nobody listens");
    }

    #[test]
    fn test_event_serialization() {
        let event = TurnEvent::ToolDenied {
            step: 2,
            tool_name: "calculateQuote".to_string(),
            reason: "analyze first".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"event": "tool_denied", "step": 2, "tool_name": "calculateQuote", "reason": "analyze first"})
        );
    }
}
