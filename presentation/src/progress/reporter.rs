//! Progress reporting for turn execution

use arkcutt_application::TurnProgressNotifier;
use arkcutt_domain::{StepPhase, TerminationReason, ToolCall, ToolResult};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner for the current phase with one line per tool outcome
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn phase_message(phase: StepPhase) -> &'static str {
        match phase {
            StepPhase::Thinking => "Thinking...",
            StepPhase::Executing => "Running tools...",
            StepPhase::Evaluating => "Checking progress...",
            StepPhase::Done => "Done",
        }
    }

    /// Print above the spinner, or plainly when none is active.
    fn println(&self, line: String) {
        match self.spinner.lock().ok().and_then(|s| s.clone()) {
            Some(pb) => pb.println(line),
            None => eprintln!("{}", line),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for ProgressReporter {
    fn on_phase_change(&self, step: usize, phase: StepPhase) {
        let Ok(mut spinner) = self.spinner.lock() else {
            return;
        };
        if phase == StepPhase::Done {
            if let Some(pb) = spinner.take() {
                pb.finish_and_clear();
            }
            return;
        }

        let pb = spinner.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        pb.set_prefix(format!("Step {}", step));
        pb.set_message(Self::phase_message(phase));
    }

    fn on_tool_call(&self, _step: usize, call: &ToolCall) {
        self.println(format!("  {} {}", "->".cyan(), call.tool_name));
    }

    fn on_tool_denied(&self, _step: usize, tool_name: &str, reason: &str) {
        self.println(format!(
            "  {} {} {}",
            "!".yellow(),
            tool_name,
            format!("({})", reason).dimmed()
        ));
    }

    fn on_tool_result(&self, _step: usize, result: &ToolResult) {
        let line = match &result.error {
            None => format!("  {} {}", "v".green(), result.tool_name),
            Some(error) => format!(
                "  {} {} {}",
                "x".red(),
                result.tool_name,
                format!("({}: {})", error.kind, error.message).dimmed()
            ),
        };
        self.println(line);
    }

    fn on_turn_complete(&self, _steps: usize, _reason: &TerminationReason) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

/// Simple text-based progress (no spinner)
pub struct SimpleProgress;

impl TurnProgressNotifier for SimpleProgress {
    fn on_phase_change(&self, step: usize, phase: StepPhase) {
        if phase == StepPhase::Thinking {
            eprintln!("{} {}", "->".cyan(), format!("Step {}", step).bold());
        }
    }

    fn on_tool_call(&self, _step: usize, call: &ToolCall) {
        eprintln!("  {} {}", "call".cyan(), call.tool_name);
    }

    fn on_tool_denied(&self, _step: usize, tool_name: &str, reason: &str) {
        eprintln!("  {} {} ({})", "denied".yellow(), tool_name, reason);
    }

    fn on_tool_result(&self, _step: usize, result: &ToolResult) {
        if result.success {
            eprintln!("  {} {}", "v".green(), result.tool_name);
        } else {
            eprintln!("  {} {} (failed)", "x".red(), result.tool_name);
        }
    }
}
