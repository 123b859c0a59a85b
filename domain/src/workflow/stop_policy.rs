//! Stop policies: when a turn's tool loop should end
//!
//! Policies are pure functions of `(history, step_count)`. Calling one
//! twice with the same inputs gives the same answer.

use super::history::History;
use crate::tool::names::{ANALYZE_DXF, CALCULATE_QUOTE};

/// Decides whether the tool loop should terminate after a step
pub trait StopPolicy: Send + Sync {
    /// Short identifier used in logs and termination reasons
    fn name(&self) -> String;

    fn should_stop(&self, history: &History, step_count: usize) -> bool;

    /// Name of the policy that triggered the stop, if any.
    fn stop_reason(&self, history: &History, step_count: usize) -> Option<String> {
        self.should_stop(history, step_count).then(|| self.name())
    }
}

/// Stop once every listed tool has at least one successful result.
#[derive(Debug, Clone)]
pub struct AllSucceeded {
    tools: Vec<String>,
}

impl AllSucceeded {
    pub fn new<I, S>(tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tools: tools.into_iter().map(Into::into).collect(),
        }
    }
}

impl StopPolicy for AllSucceeded {
    fn name(&self) -> String {
        format!("all_succeeded({})", self.tools.join(", "))
    }

    fn should_stop(&self, history: &History, _step_count: usize) -> bool {
        !self.tools.is_empty() && self.tools.iter().all(|t| history.has_success(t))
    }
}

/// Stop once the step counter reaches `n`.
#[derive(Debug, Clone, Copy)]
pub struct StepCountIs(pub usize);

impl StopPolicy for StepCountIs {
    fn name(&self) -> String {
        format!("step_count_is({})", self.0)
    }

    fn should_stop(&self, _history: &History, step_count: usize) -> bool {
        step_count >= self.0
    }
}

/// Stop when any child policy says so; children are consulted in order.
#[derive(Default)]
pub struct AnyOf {
    policies: Vec<Box<dyn StopPolicy>>,
}

impl AnyOf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, policy: impl StopPolicy + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }
}

impl StopPolicy for AnyOf {
    fn name(&self) -> String {
        let names: Vec<String> = self.policies.iter().map(|p| p.name()).collect();
        format!("any_of[{}]", names.join(", "))
    }

    fn should_stop(&self, history: &History, step_count: usize) -> bool {
        self.policies
            .iter()
            .any(|p| p.should_stop(history, step_count))
    }

    fn stop_reason(&self, history: &History, step_count: usize) -> Option<String> {
        self.policies
            .iter()
            .find_map(|p| p.stop_reason(history, step_count))
    }
}

/// Default policy for the quote workflow: analysis and quote both
/// succeeded, or `ceiling` steps have run.
pub fn quote_completion_policy(ceiling: usize) -> AnyOf {
    AnyOf::new()
        .with(AllSucceeded::new([ANALYZE_DXF, CALCULATE_QUOTE]))
        .with(StepCountIs(ceiling))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolCall;
    use crate::tool::value_objects::ToolResult;
    use serde_json::json;

    fn succeed(history: &mut History, step: usize, tool: &str) {
        history.append(step, ToolCall::new(tool), ToolResult::success(tool, json!({})));
    }

    #[test]
    fn test_stops_on_happy_path() {
        let policy = quote_completion_policy(6);
        let mut history = History::new();

        succeed(&mut history, 1, ANALYZE_DXF);
        assert!(!policy.should_stop(&history, 1));

        succeed(&mut history, 2, CALCULATE_QUOTE);
        assert!(policy.should_stop(&history, 2));
        assert_eq!(
            policy.stop_reason(&history, 2).as_deref(),
            Some("all_succeeded(analyzeDXF, calculateQuote)")
        );
    }

    #[test]
    fn test_stops_at_ceiling() {
        let policy = quote_completion_policy(6);
        let history = History::new();

        assert!(!policy.should_stop(&history, 5));
        assert!(policy.should_stop(&history, 6));
        assert_eq!(
            policy.stop_reason(&history, 6).as_deref(),
            Some("step_count_is(6)")
        );
    }

    #[test]
    fn test_is_idempotent() {
        let policy = quote_completion_policy(6);
        let mut history = History::new();
        succeed(&mut history, 1, ANALYZE_DXF);

        let first = policy.should_stop(&history, 3);
        let second = policy.should_stop(&history, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn test_all_succeeded_with_no_tools_never_stops() {
        let policy = AllSucceeded::new(Vec::<String>::new());
        assert!(!policy.should_stop(&History::new(), 100));
    }

    #[test]
    fn test_empty_any_of_never_stops() {
        assert!(!AnyOf::new().should_stop(&History::new(), 100));
    }
}
