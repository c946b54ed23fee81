//! Browser automation proxy routes

use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::playwright::{supported_actions, tool_for_action};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use bridge_core::BridgeError;
use bridge_core::types::Validator;
use serde_json::{Value, json};

/// POST /playwright
pub async fn call(State(state): State<AppState>, JsonBody(body): JsonBody) -> ApiResult<Json<Value>> {
    let mut v = Validator::new();
    let Some(object) = v.object(&body, "body") else {
        v.finish()?;
        return Err(BridgeError::validation("body must be an object").into());
    };
    let action = v.non_empty_string(object, "action", "");
    let params = v.optional_object(object, "params", "").cloned().unwrap_or_default();
    v.finish()?;

    let action = action.unwrap_or_default().trim();
    let Some(tool) = tool_for_action(action) else {
        return Err(BridgeError::validation(format!(
            "action must be one of: {} (got \"{}\")",
            supported_actions().join(", "),
            action
        ))
        .into());
    };

    let data = state.playwright.call_tool(tool, params).await?;
    tracing::debug!(action, tool, "automation call succeeded");

    Ok(Json(json!({
        "success": true,
        "message": format!("{} completed", action),
        "data": data,
    })))
}

/// GET /playwright/status
pub async fn status(State(state): State<AppState>) -> Json<Value> {
    let status = state.playwright.status().await;
    Json(json!({
        "available": status.available,
        "version": status.version,
    }))
}
