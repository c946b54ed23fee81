//! Request body extraction

use crate::error::ApiError;
use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use bridge_core::BridgeError;
use bridge_core::config::timeouts::limits::MAX_BODY_BYTES;
use serde_json::Value;

/// Raw JSON body, left unvalidated for per-route schema checks
///
/// Oversized bodies become 413 and unparsable ones 400, both rendered as
/// [`ApiError`] JSON.
#[derive(Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError(BridgeError::payload_too_large(MAX_BODY_BYTES))
            } else {
                ApiError(BridgeError::validation(format!(
                    "body could not be read: {}",
                    rejection.body_text()
                )))
            }
        })?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|e| ApiError(BridgeError::validation(format!("body is not valid JSON: {}", e))))
    }
}
