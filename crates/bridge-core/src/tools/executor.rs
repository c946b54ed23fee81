//! Tool execution engine

use super::base::Tool;
use super::types::{ToolCall, ToolResult, ToolSchema};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Executes named tool calls against a fixed set of tools
///
/// Execution never fails: unknown tools, tool errors and panics all come
/// back as an unsuccessful [`ToolResult`].
#[derive(Clone, Default)]
pub struct ToolExecutor {
    tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for ToolExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolExecutor")
            .field("tools", &self.tool_names())
            .finish()
    }
}

impl ToolExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        let mut executor = Self::new();
        for tool in tools {
            executor.register_tool(tool);
        }
        executor
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) {
        self.tools.retain(|existing| existing.name() != tool.name());
        self.tools.push(tool);
    }

    pub fn get_tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.get_tool(name).is_some()
    }

    /// Registered tool names in registration order
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Schemas for every registered tool, in registration order
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.tools.iter().map(|tool| tool.schema()).collect()
    }

    /// Execute a single tool call
    pub async fn execute_tool(&self, call: &ToolCall) -> ToolResult {
        let Some(tool) = self.get_tool(&call.name) else {
            tracing::warn!(tool = %call.name, "model requested unknown tool");
            return ToolResult::error(
                &call.id,
                &call.name,
                format!(
                    "Unknown tool '{}'. Available tools: {}",
                    call.name,
                    self.tool_names().join(", ")
                ),
            );
        };

        tracing::debug!(tool = %call.name, call_id = %call.id, "executing tool");

        match AssertUnwindSafe(tool.execute(call)).catch_unwind().await {
            Ok(Ok(mut result)) => {
                result.call_id = call.id.clone();
                result
            }
            Ok(Err(err)) => {
                tracing::debug!(tool = %call.name, error = %err, "tool failed");
                ToolResult::error(&call.id, &call.name, err.to_string())
            }
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(tool = %call.name, panic = %message, "tool panicked");
                ToolResult::error(&call.id, &call.name, format!("Tool '{}' crashed: {}", call.name, message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolError, ToolParameter};
    use async_trait::async_trait;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echo the text parameter"
        }
        fn schema(&self) -> ToolSchema {
            ToolSchema::new(self.name(), self.description(), vec![ToolParameter::string("text", "Text")])
        }
        async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
            let text = call.require_str("text")?;
            Ok(ToolResult::success(&call.id, self.name(), text))
        }
    }

    struct PanickingTool;

    #[async_trait]
    impl Tool for PanickingTool {
        fn name(&self) -> &str {
            "boom"
        }
        fn description(&self) -> &str {
            "Always panics"
        }
        fn schema(&self) -> ToolSchema {
            ToolSchema::new(self.name(), self.description(), vec![])
        }
        async fn execute(&self, _call: &ToolCall) -> Result<ToolResult, ToolError> {
            panic!("kaboom")
        }
    }

    fn executor() -> ToolExecutor {
        ToolExecutor::with_tools(vec![Arc::new(EchoTool), Arc::new(PanickingTool)])
    }

    #[tokio::test]
    async fn test_executes_registered_tool() {
        let call = ToolCall::new("call_1", "echo").with_param("text", "hi");
        let result = executor().execute_tool(&call).await;
        assert!(result.success);
        assert_eq!(result.result, "hi");
        assert_eq!(result.call_id, "call_1");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_failed_result() {
        let call = ToolCall::new("call_1", "rm_rf");
        let result = executor().execute_tool(&call).await;
        assert!(!result.success);
        assert!(result.result.contains("Unknown tool 'rm_rf'"));
        assert!(result.result.contains("echo"));
    }

    #[tokio::test]
    async fn test_tool_error_is_failed_result() {
        let call = ToolCall::new("call_1", "echo");
        let result = executor().execute_tool(&call).await;
        assert!(!result.success);
        assert!(result.result.contains("'text' parameter is required"));
    }

    #[tokio::test]
    async fn test_panic_is_captured() {
        let call = ToolCall::new("call_1", "boom");
        let result = executor().execute_tool(&call).await;
        assert!(!result.success);
        assert!(result.result.contains("kaboom"));
    }

    #[test]
    fn test_schemas_follow_registration_order() {
        let names: Vec<_> = executor().schemas().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["echo", "boom"]);
    }

    #[test]
    fn test_register_replaces_same_name() {
        let mut executor = executor();
        executor.register_tool(Arc::new(EchoTool));
        assert_eq!(executor.tool_names(), vec!["boom", "echo"]);
    }
}
