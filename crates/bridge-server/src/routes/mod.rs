//! Route table

mod chat;
mod file;
mod health;
mod models;
mod playwright;

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Router, middleware};
use bridge_core::BridgeError;
use bridge_core::config::timeouts::limits::MAX_BODY_BYTES;
use tower_http::trace::TraceLayer;

/// Build the gateway router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/models", get(models::list_models))
        .route("/chat", post(chat::chat))
        .route("/file", post(file::file))
        .route("/playwright", post(playwright::call))
        .route("/playwright/status", get(playwright::status))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_client))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> ApiError {
    ApiError(BridgeError::not_found("No such route"))
}
