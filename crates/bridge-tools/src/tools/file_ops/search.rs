//! Workspace search tool

use crate::tools::names;
use async_trait::async_trait;
use bridge_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};
use bridge_core::workspace::{self, Workspace};

/// Files enumerated before filtering
const MAX_ENUMERATED: usize = 1000;
/// Paths listed in the result
const MAX_LISTED: usize = 20;
const DEFAULT_PATTERN: &str = "**/*";
const EXCLUDE_PATTERN: &str = "**/node_modules/**";

/// Find workspace files whose path contains a query string
pub struct SearchWorkspaceTool {
    workspace: Option<Workspace>,
}

impl SearchWorkspaceTool {
    pub fn new(workspace: Option<Workspace>) -> Self {
        Self { workspace }
    }
}

#[async_trait]
impl Tool for SearchWorkspaceTool {
    fn name(&self) -> &str {
        names::SEARCH_WORKSPACE
    }

    fn description(&self) -> &str {
        "Search the open workspace for files whose path contains the query (case-insensitive)."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("query", "Text to look for in file paths"),
                ToolParameter::optional_string(
                    "filePattern",
                    "Glob limiting which files are searched, e.g. **/*.rs",
                ),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let workspace = workspace::require(self.workspace.as_ref())?;
        let query = call.require_str("query")?;
        let pattern = call
            .get_str("filePattern")?
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PATTERN);

        let files = workspace
            .fs()
            .find_files(workspace.root(), pattern, Some(EXCLUDE_PATTERN), MAX_ENUMERATED)
            .await?;

        let needle = query.to_lowercase();
        let matches: Vec<&String> = files
            .iter()
            .filter(|path| path.to_lowercase().contains(&needle))
            .collect();

        tracing::debug!(query, pattern, scanned = files.len(), matched = matches.len(), "workspace search");

        if matches.is_empty() {
            return Ok(ToolResult::success(
                &call.id,
                self.name(),
                format!("No files found matching \"{}\"", query),
            ));
        }

        let mut output = format!("Found {} file(s) matching \"{}\":", matches.len(), query);
        for path in matches.iter().take(MAX_LISTED) {
            output.push_str("\n- ");
            output.push_str(path);
        }
        if matches.len() > MAX_LISTED {
            output.push_str(&format!("\n... and {} more", matches.len() - MAX_LISTED));
        }

        Ok(ToolResult::success(&call.id, self.name(), output))
    }
}
