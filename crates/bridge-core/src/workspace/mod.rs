//! Workspace root and filesystem access

mod fs;
pub mod path_safety;

pub use fs::{FileStat, LocalWorkspaceFs, WorkspaceFs, local_workspace};
pub use path_safety::{is_safe_relative_path, is_within_workspace, to_workspace_file_path};

use crate::error::{BridgeError, BridgeResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The single directory file operations are confined to, plus the
/// filesystem used to reach it
#[derive(Clone)]
pub struct Workspace {
    root: PathBuf,
    fs: Arc<dyn WorkspaceFs>,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace").field("root", &self.root).finish()
    }
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, fs: Arc<dyn WorkspaceFs>) -> Self {
        Self {
            root: root.into(),
            fs,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fs(&self) -> &dyn WorkspaceFs {
        self.fs.as_ref()
    }

    /// Resolve a caller-supplied relative path, rejecting anything unsafe
    pub fn resolve(&self, relative: &str) -> BridgeResult<PathBuf> {
        to_workspace_file_path(&self.root, relative).ok_or_else(|| {
            BridgeError::validation(format!(
                "path: '{}' is not a safe path inside the workspace",
                relative
            ))
        })
    }
}

/// Unwrap an optional workspace, failing with `NoWorkspace`
pub fn require(workspace: Option<&Workspace>) -> BridgeResult<&Workspace> {
    workspace.ok_or(BridgeError::NoWorkspace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_accepts_safe_and_rejects_unsafe() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = local_workspace(temp_dir.path());

        assert!(workspace.resolve("docs/a.md").is_ok());
        let err = workspace.resolve("../a.md").unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_require_without_workspace() {
        let err = require(None).unwrap_err();
        assert!(matches!(err, BridgeError::NoWorkspace));
    }
}
