//! Terminal launch tool

use crate::tools::names;
use async_trait::async_trait;
use bridge_core::tools::{Tool, ToolCall, ToolError, ToolParameter, ToolResult, ToolSchema};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::process::Command;

/// Starts a shell command without waiting for it
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TerminalLauncher: Send + Sync {
    /// Launch `command`; returns once the process has been started
    async fn launch(&self, command: &str) -> std::io::Result<()>;
}

/// Spawns a detached system shell
#[derive(Debug, Clone, Default)]
pub struct ProcessTerminalLauncher {
    working_directory: Option<PathBuf>,
}

impl ProcessTerminalLauncher {
    pub fn new(working_directory: Option<PathBuf>) -> Self {
        Self { working_directory }
    }

    fn shell_command(command: &str) -> Command {
        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.arg("/C").arg(command);
            cmd
        };
        #[cfg(not(windows))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        cmd
    }
}

#[async_trait]
impl TerminalLauncher for ProcessTerminalLauncher {
    async fn launch(&self, command: &str) -> std::io::Result<()> {
        let mut cmd = Self::shell_command(command);
        if let Some(dir) = &self.working_directory {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn()?;
        let pid = child.id();
        tracing::info!(?pid, "launched terminal command");

        // Reap in the background so the child never lingers as a zombie
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => tracing::debug!(?pid, %status, "terminal command exited"),
                Err(e) => tracing::warn!(?pid, error = %e, "failed to wait for terminal command"),
            }
        });
        Ok(())
    }
}

/// Run a shell command in the workspace, if enabled
pub struct RunTerminalTool {
    launcher: Arc<dyn TerminalLauncher>,
    enabled: Arc<AtomicBool>,
}

impl RunTerminalTool {
    pub fn new(launcher: Arc<dyn TerminalLauncher>, enabled: Arc<AtomicBool>) -> Self {
        Self { launcher, enabled }
    }
}

#[async_trait]
impl Tool for RunTerminalTool {
    fn name(&self) -> &str {
        names::RUN_TERMINAL
    }

    fn description(&self) -> &str {
        "Run a shell command in a new terminal. The output is not captured; the command runs in the background."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            self.name(),
            self.description(),
            vec![ToolParameter::string("command", "The shell command to run")],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        if !self.enabled.load(Ordering::Relaxed) {
            return Err(ToolError::Disabled(
                "Terminal commands are disabled. Set `tools.enable_terminal = true` in bridge.toml \
                 or BRIDGE_ENABLE_TERMINAL=1 to allow them."
                    .to_string(),
            ));
        }

        let command = call.require_str("command")?.trim();
        if command.is_empty() {
            return Err(ToolError::InvalidArguments(
                "'command' must not be empty".to_string(),
            ));
        }

        self.launcher
            .launch(command)
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to launch terminal: {}", e)))?;

        Ok(ToolResult::success(
            &call.id,
            self.name(),
            format!("Started in terminal: {}", command),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    fn call(command: &str) -> ToolCall {
        ToolCall::new("call-1", names::RUN_TERMINAL).with_param("command", command)
    }

    #[tokio::test]
    async fn test_disabled_by_default() {
        let mut launcher = MockTerminalLauncher::new();
        launcher.expect_launch().never();

        let tool = RunTerminalTool::new(Arc::new(launcher), Arc::new(AtomicBool::new(false)));
        let err = tool.execute(&call("ls")).await.unwrap_err();

        assert!(matches!(err, ToolError::Disabled(_)));
        assert!(err.to_string().contains("enable_terminal"));
    }

    #[tokio::test]
    async fn test_enabled_launches_command() {
        let mut launcher = MockTerminalLauncher::new();
        launcher
            .expect_launch()
            .with(eq("cargo test"))
            .times(1)
            .returning(|_| Ok(()));

        let tool = RunTerminalTool::new(Arc::new(launcher), Arc::new(AtomicBool::new(true)));
        let result = tool.execute(&call("  cargo test ")).await.unwrap();

        assert!(result.success);
        assert_eq!(result.result, "Started in terminal: cargo test");
    }

    #[tokio::test]
    async fn test_flag_is_read_on_each_call() {
        let mut launcher = MockTerminalLauncher::new();
        launcher.expect_launch().times(1).returning(|_| Ok(()));

        let enabled = Arc::new(AtomicBool::new(false));
        let tool = RunTerminalTool::new(Arc::new(launcher), enabled.clone());

        assert!(tool.execute(&call("ls")).await.is_err());
        enabled.store(true, Ordering::Relaxed);
        assert!(tool.execute(&call("ls")).await.is_ok());
    }

    #[tokio::test]
    async fn test_launch_failure_is_reported() {
        let mut launcher = MockTerminalLauncher::new();
        launcher
            .expect_launch()
            .returning(|_| Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no shell")));

        let tool = RunTerminalTool::new(Arc::new(launcher), Arc::new(AtomicBool::new(true)));
        let err = tool.execute(&call("ls")).await.unwrap_err();
        assert!(err.to_string().contains("no shell"));
    }

    #[tokio::test]
    async fn test_empty_command_rejected() {
        let mut launcher = MockTerminalLauncher::new();
        launcher.expect_launch().never();

        let tool = RunTerminalTool::new(Arc::new(launcher), Arc::new(AtomicBool::new(true)));
        assert!(matches!(
            tool.execute(&call("   ")).await,
            Err(ToolError::InvalidArguments(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_process_launcher_starts_shell() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let launcher = ProcessTerminalLauncher::new(Some(temp_dir.path().to_path_buf()));
        launcher.launch("touch started").await.unwrap();

        let marker = temp_dir.path().join("started");
        for _ in 0..50 {
            if marker.exists() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert!(marker.exists());
    }
}
