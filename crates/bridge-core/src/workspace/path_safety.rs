//! Path validation for every filesystem-touching operation
//!
//! Two independent checks gate access to the workspace:
//!
//! - [`is_safe_relative_path`] is purely syntactic and rejects absolute,
//!   URL, drive-letter and traversal forms.
//! - [`is_within_workspace`] resolves both paths through the filesystem so a
//!   symlink cannot lead a path out of the root.
//!
//! [`to_workspace_file_path`] applies both and is the only way tools and
//! routes obtain a path they may read, write or delete.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

/// Whether `path` is a syntactically safe workspace-relative path
pub fn is_safe_relative_path(path: &str) -> bool {
    let normalized = path.replace('\\', "/");
    let normalized = normalized.trim();

    if normalized.is_empty() || normalized.starts_with('/') || normalized.ends_with('/') {
        return false;
    }
    // Covers `://` as well as drive letters such as `C:`
    if normalized.contains(':') {
        return false;
    }

    normalized
        .split('/')
        .all(|segment| !segment.is_empty() && segment != "." && segment != "..")
}

/// Whether `candidate` resolves to `root` itself or somewhere beneath it
pub fn is_within_workspace(root: &Path, candidate: &Path) -> bool {
    let (Some(root), Some(candidate)) = (resolve(root), resolve(candidate)) else {
        return false;
    };

    if cfg!(any(windows, target_os = "macos")) {
        fold_case(&candidate).starts_with(fold_case(&root))
    } else {
        candidate.starts_with(&root)
    }
}

/// Resolve `relative` under `root`, or `None` if either check fails
pub fn to_workspace_file_path(root: &Path, relative: &str) -> Option<PathBuf> {
    if !is_safe_relative_path(relative) {
        return None;
    }

    let mut path = root.to_path_buf();
    for segment in relative.trim().replace('\\', "/").split('/') {
        path.push(segment);
    }

    if is_within_workspace(root, &path) {
        Some(path)
    } else {
        None
    }
}

/// Make absolute, normalize lexically, then canonicalize the nearest
/// existing ancestor and re-append the missing tail. A dangling symlink
/// counts as existing, so it fails to canonicalize and yields `None`.
fn resolve(path: &Path) -> Option<PathBuf> {
    let absolute = std::path::absolute(path).ok()?;
    let normalized = normalize_lexically(&absolute);

    let mut existing = normalized.as_path();
    let mut tail: Vec<OsString> = Vec::new();
    loop {
        if std::fs::symlink_metadata(existing).is_ok() {
            break;
        }
        tail.push(existing.file_name()?.to_os_string());
        existing = existing.parent()?;
    }

    let mut resolved = existing.canonicalize().ok()?;
    for segment in tail.into_iter().rev() {
        resolved.push(segment);
    }
    Some(resolved)
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

fn fold_case(path: &Path) -> PathBuf {
    PathBuf::from(path.to_string_lossy().to_lowercase())
}
