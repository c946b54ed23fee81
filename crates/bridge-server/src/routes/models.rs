use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use bridge_core::ModelInfo;

/// GET /models
pub async fn list_models(State(state): State<AppState>) -> ApiResult<Json<Vec<ModelInfo>>> {
    let models = state.chat.list_models().await?;
    tracing::debug!(count = models.len(), "listed models");
    Ok(Json(models))
}
