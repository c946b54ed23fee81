//! Direct workspace file operations
//!
//! Unlike the `create_file` tool, writes here happen immediately: the caller
//! is the extension acting on an explicit user action.

use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use bridge_core::types::Validator;
use bridge_core::workspace::{self, WorkspaceFs};
use bridge_core::{BridgeError, BridgeResult};
use serde_json::{Value, json};
use std::path::Path;

const ACTIONS: [&str; 4] = ["create", "read", "append", "delete"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileAction {
    Create,
    Read,
    Append,
    Delete,
}

#[derive(Debug)]
struct FileRequest {
    action: FileAction,
    path: String,
    content: Option<String>,
}

impl FileRequest {
    fn from_json(body: &Value) -> BridgeResult<Self> {
        let mut v = Validator::new();
        let Some(object) = v.object(body, "body") else {
            v.finish()?;
            return Err(BridgeError::validation("body must be an object"));
        };

        let action = v.one_of(object, "action", "", &ACTIONS);
        let path = v.non_empty_string(object, "path", "");
        let content = v.optional_string(object, "content", "");

        if matches!(action, Some("create" | "append")) && content.is_none() {
            v.reject("content", "is required for create and append");
        }
        v.finish()?;

        let action = match action {
            Some("create") => FileAction::Create,
            Some("read") => FileAction::Read,
            Some("append") => FileAction::Append,
            Some("delete") => FileAction::Delete,
            _ => return Err(BridgeError::validation("action is required")),
        };
        Ok(Self {
            action,
            path: path.unwrap_or_default().trim().to_string(),
            content: content.map(str::to_string),
        })
    }
}

/// POST /file
pub async fn file(State(state): State<AppState>, JsonBody(body): JsonBody) -> ApiResult<Json<Value>> {
    let request = FileRequest::from_json(&body)?;
    let workspace = workspace::require(state.workspace.as_ref())?;
    let target = workspace.resolve(&request.path)?;
    let fs = workspace.fs();
    let path = request.path.as_str();

    tracing::info!(action = ?request.action, path, "file request");

    let reply = match request.action {
        FileAction::Create => {
            let content = request.content.unwrap_or_default();
            fs.write(&target, content.as_bytes()).await?;
            json!({"success": true, "message": format!("Created {}", path)})
        }
        FileAction::Append => {
            let content = request.content.unwrap_or_default();
            fs.append(&target, content.as_bytes()).await?;
            json!({"success": true, "message": format!("Appended to {}", path)})
        }
        FileAction::Read => {
            require_file(fs, &target, path).await?;
            let bytes = fs.read(&target).await?;
            json!({"success": true, "content": String::from_utf8_lossy(&bytes)})
        }
        FileAction::Delete => {
            require_file(fs, &target, path).await?;
            fs.delete(&target).await?;
            json!({"success": true, "message": format!("Deleted {}", path)})
        }
    };

    Ok(Json(reply))
}

/// Fail with 404 when nothing exists and 400 for a directory
async fn require_file(fs: &dyn WorkspaceFs, target: &Path, path: &str) -> BridgeResult<()> {
    match fs.stat(target).await? {
        None => Err(BridgeError::not_found_resource(
            format!("File not found: {}", path),
            "file",
        )),
        Some(stat) if stat.is_dir => Err(BridgeError::validation(format!(
            "path: '{}' is a directory",
            path
        ))),
        Some(_) => Ok(()),
    }
}
