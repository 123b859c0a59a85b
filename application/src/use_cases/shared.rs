//! Shared utilities for use cases.

use crate::use_cases::run_turn::TurnError;
use tokio_util::sync::CancellationToken;

/// Returns `Err(TurnError::Cancelled)` if the token exists and is cancelled.
pub(crate) fn check_cancelled(token: &Option<CancellationToken>) -> Result<(), TurnError> {
    if let Some(token) = token
        && token.is_cancelled()
    {
        return Err(TurnError::Cancelled);
    }
    Ok(())
}

/// Shorten a string to at most `max` characters, appending "..." when cut.
pub(crate) fn preview(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max).collect();
    format!("{}...", cut)
}
