//! Tool Registry
//!
//! Name-keyed dispatch table: each [`ToolHandler`] is registered once under
//! the name of its definition, and the registry owns the merged [`ToolSpec`]
//! handed to the model.
//!
//! ```ignore
//! let mut registry = ToolRegistry::new();
//! registry.register(Arc::new(DeliveryInfoTool::new()))?;
//!
//! let args = registry.validate(&ToolCall::new("getDeliveryInfo"))?;
//! let handler = registry.handler("getDeliveryInfo").unwrap();
//! let payload = handler.call(&args).await?;
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use arkcutt_domain::tool::{
    entities::{DuplicateToolError, ToolCall, ToolSpec},
    handler::ToolHandler,
    validation::{DefaultToolValidator, ToolValidator, ValidatedArgs, ValidationError},
};

#[derive(Default)]
pub struct ToolRegistry {
    spec: ToolSpec,
    handlers: HashMap<String, Arc<dyn ToolHandler>>,
    validator: DefaultToolValidator,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its definition's name.
    ///
    /// Fails without side effects if the name is already taken.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) -> Result<(), DuplicateToolError> {
        let definition = handler.definition();
        let name = definition.name.clone();
        self.spec.register(definition)?;
        self.handlers.insert(name, handler);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, handler: Arc<dyn ToolHandler>) -> Result<Self, DuplicateToolError> {
        self.register(handler)?;
        Ok(self)
    }

    pub fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    pub fn handler(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.handlers.get(name)
    }

    /// Check a raw call against the registered definition.
    ///
    /// Unknown tool names fail validation.
    pub fn validate(&self, call: &ToolCall) -> Result<ValidatedArgs, ValidationError> {
        let definition = self
            .spec
            .get(&call.tool_name)
            .ok_or_else(|| ValidationError::UnknownTool(call.tool_name.clone()))?;
        self.validator.validate(call, definition)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.spec.names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arkcutt_domain::tool::entities::{ParamType, ToolDefinition, ToolParameter};
    use arkcutt_domain::tool::handler::HandlerError;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct NamedTool(&'static str);

    #[async_trait]
    impl ToolHandler for NamedTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new(self.0, "test tool").with_parameter(
                ToolParameter::required("count", "How many")
                    .with_type(ParamType::number_range(1.0, 10.0)),
            )
        }

        async fn call(&self, args: &ValidatedArgs) -> Result<Value, HandlerError> {
            Ok(args.to_json())
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = ToolRegistry::new()
            .with(Arc::new(NamedTool("alpha")))
            .unwrap();

        assert!(registry.spec().contains("alpha"));
        assert!(registry.handler("alpha").is_some());
        assert!(registry.handler("beta").is_none());
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(NamedTool("alpha"))).unwrap();
        let err = registry.register(Arc::new(NamedTool("alpha"))).unwrap_err();
        assert_eq!(err.0, "alpha");
        assert_eq!(registry.spec().len(), 1);
    }

    #[test]
    fn test_validate_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.validate(&ToolCall::new("ghost")).unwrap_err();
        assert_eq!(err, ValidationError::UnknownTool("ghost".to_string()));
    }

    #[tokio::test]
    async fn test_validate_then_call() {
        let registry = ToolRegistry::new()
            .with(Arc::new(NamedTool("alpha")))
            .unwrap();

        assert!(
            registry
                .validate(&ToolCall::new("alpha").with_arg("count", 11))
                .is_err()
        );

        let args = registry
            .validate(&ToolCall::new("alpha").with_arg("count", 3))
            .unwrap();
        let payload = registry.handler("alpha").unwrap().call(&args).await.unwrap();
        assert_eq!(payload, json!({"count": 3}));
    }
}
