//! Tool invoker, the concrete implementation of [`ToolExecutorPort`].
//!
//! ```text
//! ToolExecutorPort::execute(call)
//!   ├─ registry.validate()      → ValidationError   (handler never runs)
//!   └─ invoke(name, args)
//!        ├─ handler.call() ok   → success payload
//!        ├─ handler error       → ExecutionFailure
//!        ├─ panic               → ExecutionFailure
//!        └─ time-out            → ExecutionFailure
//! ```
//!
//! Nothing escapes: every call ends as exactly one [`ToolResult`], stamped
//! with its duration.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arkcutt_application::ports::tool_executor::ToolExecutorPort;
use arkcutt_domain::tool::{
    entities::{ToolCall, ToolSpec},
    validation::{ValidatedArgs, ValidationError},
    value_objects::{ToolError, ToolResult},
};
use async_trait::async_trait;
use futures::FutureExt;
use serde_json::json;
use tracing::{debug, warn};

use super::registry::ToolRegistry;

/// Upper bound on a single handler call
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(90);

pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
    timeout: Duration,
}

impl ToolInvoker {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Run an already-validated call.
    pub async fn invoke(&self, name: &str, args: &ValidatedArgs) -> ToolResult {
        let Some(handler) = self.registry.handler(name) else {
            return ToolResult::failure(
                name,
                ToolError::validation(ValidationError::UnknownTool(name.to_string()).to_string()),
            );
        };

        let started = Instant::now();
        let outcome = tokio::time::timeout(
            self.timeout,
            AssertUnwindSafe(handler.call(args)).catch_unwind(),
        )
        .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(Ok(Ok(payload))) => ToolResult::success(name, payload),
            Ok(Ok(Err(err))) => {
                let mut error = ToolError::execution(err.message);
                if let Some(detail) = err.detail {
                    error = error.with_detail(detail);
                }
                ToolResult::failure(name, error)
            }
            Ok(Err(panic)) => {
                let message = panic_message(panic.as_ref());
                warn!(tool = %name, panic = %message, "Tool handler panicked");
                ToolResult::failure(
                    name,
                    ToolError::execution("Tool handler panicked")
                        .with_detail(json!({ "panic": message })),
                )
            }
            Err(_) => {
                warn!(tool = %name, timeout_ms = self.timeout.as_millis() as u64, "Tool call timed out");
                ToolResult::failure(
                    name,
                    ToolError::execution(format!(
                        "Tool call timed out after {}s",
                        self.timeout.as_secs_f64()
                    ))
                    .with_detail(json!({ "timeout_ms": self.timeout.as_millis() as u64 })),
                )
            }
        };

        debug!(tool = %name, success = result.success, elapsed_ms, "Tool call settled");
        result.with_duration(elapsed_ms)
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolInvoker {
    fn tool_spec(&self) -> &ToolSpec {
        self.registry.spec()
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        match self.registry.validate(call) {
            Ok(args) => self.invoke(&call.tool_name, &args).await,
            Err(err) => {
                debug!(tool = %call.tool_name, error = %err, "Tool arguments rejected");
                let mut error = ToolError::validation(err.to_string());
                if let Some(field) = err.field() {
                    error = error.with_detail(json!({ "field": field }));
                }
                ToolResult::failure(&call.tool_name, error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkcutt_domain::tool::{
        entities::{ParamType, ToolDefinition, ToolParameter},
        handler::{HandlerError, ToolHandler},
        value_objects::ErrorKind,
    };
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Succeed,
        Fail,
        Panic,
        Hang,
    }

    struct TestTool {
        behaviour: Behaviour,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ToolHandler for TestTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("probe", "Test tool").with_parameter(
                ToolParameter::required("prompt", "Text").with_type(ParamType::string_len(3, 500)),
            )
        }

        async fn call(&self, args: &ValidatedArgs) -> Result<Value, HandlerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Succeed => Ok(json!({"echo": args.get_str("prompt")})),
                Behaviour::Fail => Err(HandlerError::new("service unavailable")
                    .with_detail(json!({"status": 503}))),
                Behaviour::Panic => panic!("boom"),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(Value::Null)
                }
            }
        }
    }

    fn invoker(behaviour: Behaviour) -> (ToolInvoker, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = ToolRegistry::new()
            .with(Arc::new(TestTool {
                behaviour,
                calls: calls.clone(),
            }))
            .unwrap();
        (ToolInvoker::new(Arc::new(registry)), calls)
    }

    fn probe(prompt: &str) -> ToolCall {
        ToolCall::new("probe").with_arg("prompt", prompt)
    }

    #[tokio::test]
    async fn test_success_records_duration() {
        let (invoker, calls) = invoker(Behaviour::Succeed);
        let result = invoker.execute(&probe("hello")).await;

        assert!(result.success);
        assert_eq!(result.payload, Some(json!({"echo": "hello"})));
        assert!(result.metadata.duration_ms.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_arguments_never_reach_handler() {
        let (invoker, calls) = invoker(Behaviour::Succeed);

        let result = invoker.execute(&probe("ab")).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::ValidationError));
        assert_eq!(result.error.unwrap().detail, Some(json!({"field": "prompt"})));

        let result = invoker.execute(&ToolCall::new("probe")).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::ValidationError));

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_validation_error() {
        let (invoker, _) = invoker(Behaviour::Succeed);
        let result = invoker.execute(&ToolCall::new("ghost")).await;
        assert_eq!(result.error_kind(), Some(ErrorKind::ValidationError));
        assert_eq!(result.tool_name, "ghost");
    }

    #[tokio::test]
    async fn test_handler_error_becomes_execution_failure() {
        let (invoker, _) = invoker(Behaviour::Fail);
        let result = invoker.execute(&probe("hello")).await;

        let error = result.error.unwrap();
        assert_eq!(error.kind, ErrorKind::ExecutionFailure);
        assert_eq!(error.message, "service unavailable");
        assert_eq!(error.detail, Some(json!({"status": 503})));
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let (invoker, _) = invoker(Behaviour::Panic);
        let result = invoker.execute(&probe("hello")).await;

        let error = result.error.unwrap();
        assert_eq!(error.kind, ErrorKind::ExecutionFailure);
        assert_eq!(error.detail, Some(json!({"panic": "boom"})));
    }

    #[tokio::test]
    async fn test_timeout_is_execution_failure() {
        let (invoker, _) = invoker(Behaviour::Hang);
        let invoker = invoker.with_timeout(Duration::from_millis(20));
        let result = invoker.execute(&probe("hello")).await;

        assert_eq!(result.error_kind(), Some(ErrorKind::ExecutionFailure));
        assert!(result.error.unwrap().message.contains("timed out"));
    }
}
