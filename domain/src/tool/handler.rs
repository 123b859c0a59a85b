//! Tool handler abstraction
//!
//! A [`ToolHandler`] pairs a [`ToolDefinition`] with the side-effecting
//! function that runs it. Handlers only ever see arguments that already
//! passed validation.

use async_trait::async_trait;
use thiserror::Error;

use super::entities::ToolDefinition;
use super::validation::ValidatedArgs;

/// Failure reported by a handler.
///
/// The invoker turns this into an `ExecutionFailure` result; it is never
/// raised past the tool layer.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct HandlerError {
    pub message: String,
    pub detail: Option<serde_json::Value>,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<serde_json::Value>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Execution side of a registered tool
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Static definition: name, description, parameter contract
    fn definition(&self) -> ToolDefinition;

    /// Run the tool, performing at most one outbound collaborator request.
    ///
    /// Returns the normalized success payload.
    async fn call(&self, args: &ValidatedArgs) -> Result<serde_json::Value, HandlerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoHandler;

    #[async_trait]
    impl ToolHandler for EchoHandler {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("echo", "Echo the arguments back")
        }

        async fn call(&self, args: &ValidatedArgs) -> Result<serde_json::Value, HandlerError> {
            if args.is_empty() {
                return Err(HandlerError::new("nothing to echo").with_detail(json!({"len": 0})));
            }
            Ok(args.to_json())
        }
    }

    #[tokio::test]
    async fn test_handler_success() {
        let args = ValidatedArgs::new().with("text", "hola");
        let out = EchoHandler.call(&args).await.unwrap();
        assert_eq!(out, json!({"text": "hola"}));
    }

    #[tokio::test]
    async fn test_handler_failure_carries_detail() {
        let err = EchoHandler.call(&ValidatedArgs::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "nothing to echo");
        assert_eq!(err.detail, Some(json!({"len": 0})));
    }
}
