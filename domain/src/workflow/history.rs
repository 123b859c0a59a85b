//! Turn history: the ordered record of tool calls and their results

use serde::{Deserialize, Serialize};

use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolResult;

/// One `{request, result}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Step (1-based) in which the call was made
    pub step: usize,
    pub request: ToolCall,
    pub result: ToolResult,
}

/// Append-only, totally ordered record of a single turn
///
/// Owned by the step controller; guards and stop policies only read it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, step: usize, request: ToolCall, result: ToolResult) {
        self.entries.push(HistoryEntry {
            step,
            request,
            result,
        });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any call to `tool_name` has succeeded so far.
    pub fn has_success(&self, tool_name: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.result.tool_name == tool_name && e.result.success)
    }

    /// Most recent successful result for `tool_name`.
    pub fn last_success(&self, tool_name: &str) -> Option<&ToolResult> {
        self.entries
            .iter()
            .rev()
            .map(|e| &e.result)
            .find(|r| r.tool_name == tool_name && r.success)
    }

    /// Entries recorded during a given step, in request order.
    pub fn in_step(&self, step: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(move |e| e.step == step)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
