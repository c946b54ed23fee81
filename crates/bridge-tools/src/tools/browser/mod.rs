//! Browser action tool
//!
//! Actions are not performed here. The tool renders them in the
//! `[ACTION: name, args]` syntax that the extension interprets when it
//! reads the reply.

use crate::tools::names;
use async_trait::async_trait;
use bridge_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};

const ACTIONS: [&str; 10] = [
    "navigate",
    "click",
    "type",
    "scroll",
    "screenshot",
    "wait",
    "back",
    "forward",
    "refresh",
    "extract",
];

const DEFAULT_SCROLL: &str = "down";
const DEFAULT_WAIT_MS: &str = "1000";

/// Encode a browser action as a command string
#[derive(Debug, Default)]
pub struct BrowserActionTool;

impl BrowserActionTool {
    pub fn new() -> Self {
        Self
    }
}

/// Render `action` with its arguments
pub fn format_action(
    action: &str,
    selector: Option<&str>,
    value: Option<&str>,
) -> Result<String, ToolError> {
    let missing = |what: &str| {
        ToolError::InvalidArguments(format!("'{}' requires '{}'", action, what))
    };

    let args: Vec<&str> = match action {
        "navigate" => vec![value.or(selector).ok_or_else(|| missing("value"))?],
        "click" => vec![selector.ok_or_else(|| missing("selector"))?],
        "type" => vec![
            selector.ok_or_else(|| missing("selector"))?,
            value.ok_or_else(|| missing("value"))?,
        ],
        "scroll" => vec![value.unwrap_or(DEFAULT_SCROLL)],
        "wait" => vec![value.unwrap_or(DEFAULT_WAIT_MS)],
        "extract" => selector.into_iter().collect(),
        "screenshot" | "back" | "forward" | "refresh" => Vec::new(),
        other => {
            return Err(ToolError::InvalidArguments(format!(
                "Unknown browser action '{}'. Supported: {}",
                other,
                ACTIONS.join(", ")
            )));
        }
    };

    let mut command = format!("[ACTION: {}", action);
    for arg in args {
        command.push_str(", ");
        command.push_str(arg);
    }
    command.push(']');
    Ok(command)
}

#[async_trait]
impl Tool for BrowserActionTool {
    fn name(&self) -> &str {
        names::BROWSER_ACTION
    }

    fn description(&self) -> &str {
        "Ask the browser extension to perform an action on the current page."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![
                ToolParameter::string("action", "The browser action to perform").with_enum(ACTIONS),
                ToolParameter::optional_string("selector", "CSS selector of the target element"),
                ToolParameter::optional_string(
                    "value",
                    "URL for navigate, text for type, direction for scroll, milliseconds for wait",
                ),
            ],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        let action = call.require_str("action")?.trim().to_lowercase();
        let selector = call.get_str("selector")?.filter(|s| !s.is_empty());
        let value = call.get_str("value")?.filter(|s| !s.is_empty());

        let command = format_action(&action, selector, value)?;
        Ok(ToolResult::success(&call.id, self.name(), command))
    }
}
