//! Workspace filesystem capability

use crate::error::{BridgeError, BridgeResult};
use async_trait::async_trait;
use glob::Pattern;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use walkdir::WalkDir;

/// Metadata returned by [`WorkspaceFs::stat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_file: bool,
    pub is_dir: bool,
    pub len: u64,
}

/// Filesystem operations scoped to one workspace root
///
/// Callers pass paths already approved by
/// [`to_workspace_file_path`](super::to_workspace_file_path).
#[async_trait]
pub trait WorkspaceFs: Send + Sync {
    /// `None` when nothing exists at `path`
    async fn stat(&self, path: &Path) -> BridgeResult<Option<FileStat>>;

    async fn read(&self, path: &Path) -> BridgeResult<Vec<u8>>;

    /// Create or replace the file, creating parent directories
    async fn write(&self, path: &Path, contents: &[u8]) -> BridgeResult<()>;

    /// Append to the file, creating it if needed
    async fn append(&self, path: &Path, contents: &[u8]) -> BridgeResult<()>;

    async fn delete(&self, path: &Path) -> BridgeResult<()>;

    /// Enumerate files under `root` whose `/`-separated relative path
    /// matches `include` and not `exclude`, stopping after `max` matches.
    async fn find_files(
        &self,
        root: &Path,
        include: &str,
        exclude: Option<&str>,
        max: usize,
    ) -> BridgeResult<Vec<String>>;
}

/// [`WorkspaceFs`] backed by the local disk
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalWorkspaceFs;

#[async_trait]
impl WorkspaceFs for LocalWorkspaceFs {
    async fn stat(&self, path: &Path) -> BridgeResult<Option<FileStat>> {
        match tokio::fs::metadata(path).await {
            Ok(meta) => Ok(Some(FileStat {
                is_file: meta.is_file(),
                is_dir: meta.is_dir(),
                len: meta.len(),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("stat", path, e)),
        }
    }

    async fn read(&self, path: &Path) -> BridgeResult<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                BridgeError::not_found_resource(format!("File not found: {}", path.display()), "file")
            }
            _ => io_error("read", path, e),
        })
    }

    async fn write(&self, path: &Path, contents: &[u8]) -> BridgeResult<()> {
        ensure_parent(path).await?;
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| io_error("write", path, e))
    }

    async fn append(&self, path: &Path, contents: &[u8]) -> BridgeResult<()> {
        ensure_parent(path).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| io_error("open", path, e))?;
        file.write_all(contents)
            .await
            .map_err(|e| io_error("append to", path, e))?;
        file.flush().await.map_err(|e| io_error("flush", path, e))
    }

    async fn delete(&self, path: &Path) -> BridgeResult<()> {
        tokio::fs::remove_file(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                BridgeError::not_found_resource(format!("File not found: {}", path.display()), "file")
            }
            _ => io_error("delete", path, e),
        })
    }

    async fn find_files(
        &self,
        root: &Path,
        include: &str,
        exclude: Option<&str>,
        max: usize,
    ) -> BridgeResult<Vec<String>> {
        let include = Pattern::new(include)
            .map_err(|e| BridgeError::validation(format!("Invalid file pattern '{}': {}", include, e)))?;
        let exclude = exclude
            .map(Pattern::new)
            .transpose()
            .map_err(|e| BridgeError::validation(format!("Invalid exclude pattern: {}", e)))?;
        let root = root.to_path_buf();

        tokio::task::spawn_blocking(move || walk(&root, &include, exclude.as_ref(), max))
            .await
            .map_err(|e| BridgeError::internal(format!("File enumeration task failed: {}", e)))
    }
}

fn walk(root: &Path, include: &Pattern, exclude: Option<&Pattern>, max: usize) -> Vec<String> {
    let excluded = |relative: &str| exclude.is_some_and(|p| p.matches(relative));
    let mut found = Vec::new();

    let entries = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| {
            // Prune whole directories the exclude pattern covers
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            match relative_path(root, entry.path()) {
                Some(relative) => !excluded(&format!("{}/_", relative)),
                None => true,
            }
        });

    for entry in entries.filter_map(Result::ok) {
        if found.len() >= max {
            break;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(relative) = relative_path(root, entry.path()) else {
            continue;
        };
        if include.matches(&relative) && !excluded(&relative) {
            found.push(relative);
        }
    }

    found
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}

async fn ensure_parent(path: &Path) -> BridgeResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error("create directory for", path, e))?;
    }
    Ok(())
}

fn io_error(op: &str, path: &Path, e: std::io::Error) -> BridgeError {
    BridgeError::io_with_path(format!("Failed to {} file: {}", op, e), path.display().to_string())
}

/// Convenience for building a workspace from a root path
pub fn local_workspace(root: impl Into<PathBuf>) -> super::Workspace {
    super::Workspace::new(root, std::sync::Arc::new(LocalWorkspaceFs))
}
