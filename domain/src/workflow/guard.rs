//! Workflow guard: cross-tool ordering preconditions
//!
//! Rules are evaluated in order and the first denial wins. Tools no rule
//! mentions are always allowed.

use serde::{Deserialize, Serialize};

use super::history::History;
use crate::tool::names::{ANALYZE_DXF, CALCULATE_QUOTE};

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum GuardDecision {
    Allow,
    Deny {
        /// Name of the rule that denied the call
        rule: String,
        reason: String,
    },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// A predicate over the history for one tool call
pub trait WorkflowRule: Send + Sync {
    fn name(&self) -> &str;

    /// `Some(reason)` to deny `tool_name`, `None` to let it through.
    fn deny_reason(&self, tool_name: &str, history: &History) -> Option<String>;
}

/// Deny `target` until `prerequisite` has at least one successful result.
#[derive(Debug, Clone)]
pub struct RequiresPriorSuccess {
    name: String,
    target: String,
    prerequisite: String,
    reason: String,
}

impl RequiresPriorSuccess {
    pub fn new(target: impl Into<String>, prerequisite: impl Into<String>) -> Self {
        let target = target.into();
        let prerequisite = prerequisite.into();
        Self {
            name: format!("{}_requires_{}", target, prerequisite),
            reason: format!(
                "{} requires a successful {} result first",
                target, prerequisite
            ),
            target,
            prerequisite,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}

impl WorkflowRule for RequiresPriorSuccess {
    fn name(&self) -> &str {
        &self.name
    }

    fn deny_reason(&self, tool_name: &str, history: &History) -> Option<String> {
        (tool_name == self.target && !history.has_success(&self.prerequisite))
            .then(|| self.reason.clone())
    }
}

/// Ordered set of workflow rules
#[derive(Default)]
pub struct WorkflowGuard {
    rules: Vec<Box<dyn WorkflowRule>>,
}

impl WorkflowGuard {
    /// Guard with no rules; every call is allowed.
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Rules of the quote workflow: a quote needs a successful analysis.
    pub fn quote_workflow() -> Self {
        Self::permissive().with_rule(
            RequiresPriorSuccess::new(CALCULATE_QUOTE, ANALYZE_DXF).with_reason(
                "calculateQuote requires a successful analyzeDXF result in this turn. \
                 Area and cut lengths must come from the file analysis; \
                 call analyzeDXF first.",
            ),
        )
    }

    pub fn with_rule(mut self, rule: impl WorkflowRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn check(&self, tool_name: &str, history: &History) -> GuardDecision {
        for rule in &self.rules {
            if let Some(reason) = rule.deny_reason(tool_name, history) {
                return GuardDecision::Deny {
                    rule: rule.name().to_string(),
                    reason,
                };
            }
        }
        GuardDecision::Allow
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl std::fmt::Debug for WorkflowGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowGuard")
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolCall;
    use crate::tool::value_objects::{ToolError, ToolResult};
    use serde_json::json;

    fn with_analysis(success: bool) -> History {
        let mut history = History::new();
        let result = if success {
            ToolResult::success(ANALYZE_DXF, json!({"area_mm2": 12000.0}))
        } else {
            ToolResult::failure(ANALYZE_DXF, ToolError::execution("bad file"))
        };
        history.append(1, ToolCall::new(ANALYZE_DXF), result);
        history
    }

    #[test]
    fn test_quote_denied_on_empty_history() {
        let guard = WorkflowGuard::quote_workflow();
        let decision = guard.check(CALCULATE_QUOTE, &History::new());

        match decision {
            GuardDecision::Deny { rule, reason } => {
                assert_eq!(rule, "calculateQuote_requires_analyzeDXF");
                assert!(reason.contains("analyzeDXF"));
            }
            GuardDecision::Allow => panic!("expected deny"),
        }
    }

    #[test]
    fn test_quote_denied_after_failed_analysis() {
        let guard = WorkflowGuard::quote_workflow();
        assert!(!guard.check(CALCULATE_QUOTE, &with_analysis(false)).is_allowed());
    }

    #[test]
    fn test_quote_allowed_after_successful_analysis() {
        let guard = WorkflowGuard::quote_workflow();
        assert!(guard.check(CALCULATE_QUOTE, &with_analysis(true)).is_allowed());
    }

    #[test]
    fn test_other_tools_always_allowed() {
        let guard = WorkflowGuard::quote_workflow();
        for tool in ["analyzeDXF", "getMaterialOptions", "getDeliveryInfo"] {
            assert!(guard.check(tool, &History::new()).is_allowed());
        }
    }

    struct DenyAll;

    impl WorkflowRule for DenyAll {
        fn name(&self) -> &str {
            "deny_all"
        }

        fn deny_reason(&self, _tool_name: &str, _history: &History) -> Option<String> {
            Some("closed".to_string())
        }
    }

    #[test]
    fn test_first_denying_rule_wins() {
        let guard = WorkflowGuard::permissive()
            .with_rule(RequiresPriorSuccess::new(CALCULATE_QUOTE, ANALYZE_DXF))
            .with_rule(DenyAll);

        match guard.check(CALCULATE_QUOTE, &History::new()) {
            GuardDecision::Deny { rule, .. } => assert_eq!(rule, "calculateQuote_requires_analyzeDXF"),
            GuardDecision::Allow => panic!("expected deny"),
        }
        match guard.check(ANALYZE_DXF, &History::new()) {
            GuardDecision::Deny { rule, .. } => assert_eq!(rule, "deny_all"),
            GuardDecision::Allow => panic!("expected deny"),
        }
    }
}
