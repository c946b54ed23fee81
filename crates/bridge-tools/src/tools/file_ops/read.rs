//! File reading tool

use crate::tools::names;
use async_trait::async_trait;
use bridge_core::config::timeouts::limits::MAX_READ_FILE_CHARS;
use bridge_core::llm::prompt::truncate_chars;
use bridge_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};
use bridge_core::workspace::{self, Workspace};

/// Read a text file inside the workspace
pub struct ReadFileTool {
    workspace: Option<Workspace>,
}

impl ReadFileTool {
    pub fn new(workspace: Option<Workspace>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        names::READ_FILE
    }

    fn description(&self) -> &str {
        "Read a text file from the open workspace. Long files are truncated."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::string(
                "path",
                "Path relative to the workspace root, e.g. src/main.rs",
            )],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let workspace = workspace::require(self.workspace.as_ref())?;
        let relative = call.require_str("path")?;

        let Some(path) = workspace::to_workspace_file_path(workspace.root(), relative) else {
            return Err(ToolError::PermissionDenied(format!(
                "'{}' is not a safe relative path inside the workspace",
                relative
            )));
        };

        let bytes = workspace.fs().read(&path).await?;
        let content = String::from_utf8_lossy(&bytes);
        let (shown, truncated) = truncate_chars(&content, MAX_READ_FILE_CHARS);

        let mut output = shown.to_string();
        if truncated {
            output.push_str(&format!(
                "\n\n[Truncated: showing the first {} of {} characters]",
                MAX_READ_FILE_CHARS,
                content.chars().count()
            ));
        }

        Ok(ToolResult::success(&call.id, self.name(), output))
    }
}
