//! Tool implementations for Copilot Bridge
//!
//! The agent loop can call five tools: workspace search, file reading,
//! file creation (returned to the caller, never written), terminal launch
//! and browser actions (encoded as text commands for the extension).

pub mod tools;

pub use tools::browser::BrowserActionTool;
pub use tools::file_ops::{CreateFileTool, ReadFileTool, SearchWorkspaceTool};
pub use tools::process::{ProcessTerminalLauncher, RunTerminalTool, TerminalLauncher};

use bridge_core::tools::{Tool, ToolExecutor};
use bridge_core::workspace::Workspace;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Collaborators shared by the default tools
#[derive(Clone)]
pub struct ToolContext {
    /// Absent when no workspace folder is open
    pub workspace: Option<Workspace>,
    pub terminal: Arc<dyn TerminalLauncher>,
    /// Live `tools.enable_terminal` flag, updated on config reload
    pub terminal_enabled: Arc<AtomicBool>,
}

/// Get all default tools
pub fn default_tools(ctx: ToolContext) -> Vec<Arc<dyn Tool>> {
    vec![
        Arc::new(SearchWorkspaceTool::new(ctx.workspace.clone())),
        Arc::new(ReadFileTool::new(ctx.workspace)),
        Arc::new(CreateFileTool::new()),
        Arc::new(RunTerminalTool::new(ctx.terminal, ctx.terminal_enabled)),
        Arc::new(BrowserActionTool::new()),
    ]
}

/// Executor with every default tool registered
pub fn default_executor(ctx: ToolContext) -> ToolExecutor {
    ToolExecutor::with_tools(default_tools(ctx))
}
