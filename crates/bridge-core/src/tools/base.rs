//! Tool trait and error type

use super::types::{ToolCall, ToolResult, ToolSchema};
use async_trait::async_trait;

/// Error type for tool operations
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The tool is switched off by configuration
    #[error("{0}")]
    Disabled(String),

    #[error("No workspace is open")]
    NoWorkspace,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<crate::error::BridgeError> for ToolError {
    fn from(err: crate::error::BridgeError) -> Self {
        match err {
            crate::error::BridgeError::NoWorkspace => ToolError::NoWorkspace,
            crate::error::BridgeError::Validation { .. } => ToolError::InvalidArguments(err.to_string()),
            other => ToolError::ExecutionFailed(other.to_string()),
        }
    }
}

/// A capability the model can invoke during the agent loop
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the model calls the tool by
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn schema(&self) -> ToolSchema;

    /// Execute the call
    ///
    /// Errors are reported to the model as failed results, never raised.
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError>;
}
