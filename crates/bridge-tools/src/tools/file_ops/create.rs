//! File creation tool
//!
//! The tool never writes. It hands the content back wrapped in a delimited
//! base64 block so the caller decides whether the file is saved.

use crate::tools::names;
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bridge_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};
use bridge_core::workspace::is_safe_relative_path;

/// Closing delimiter of a file payload
pub const FILE_PAYLOAD_END: &str = "<<<END_BRIDGE_FILE>>>";

/// Wrap `content` for extraction by the caller
pub fn encode_file_payload(path: &str, content: &str) -> String {
    format!(
        "<<<BRIDGE_FILE path=\"{}\" encoding=\"base64\">>>\n{}\n{}",
        path,
        STANDARD.encode(content.as_bytes()),
        FILE_PAYLOAD_END
    )
}

/// Propose a new file for the user to save
#[derive(Debug, Default)]
pub struct CreateFileTool;

impl CreateFileTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for CreateFileTool {
    fn name(&self) -> &str {
        names::CREATE_FILE
    }

    fn description(&self) -> &str {
        "Propose a new file. The content is sent to the user, who decides whether to save it."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("path", "Path relative to the workspace root"),
                ToolParameter::string("content", "Full text content of the file"),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let path = call.require_str("path")?.trim().replace('\\', "/");
        if !is_safe_relative_path(&path) {
            return Err(ToolError::PermissionDenied(format!(
                "'{}' is not a safe relative path",
                path
            )));
        }
        let content = call.require_str("content")?;

        Ok(ToolResult::success(
            &call.id,
            self.name(),
            format!(
                "Prepared {} ({} bytes) for the user to review\n{}",
                path,
                content.len(),
                encode_file_payload(&path, content)
            ),
        ))
    }
}
