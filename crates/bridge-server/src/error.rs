//! HTTP error responses

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use bridge_core::BridgeError;
use serde_json::json;

/// A [`BridgeError`] rendered as a JSON error response
///
/// Body: `{"success": false, "error": message, "code": error_code}`, plus
/// `"details"` for validation failures.
#[derive(Debug)]
pub struct ApiError(pub BridgeError);

impl From<BridgeError> for ApiError {
    fn from(error: BridgeError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(code = self.0.error_code(), error = %self.0, "request failed");
        } else {
            tracing::debug!(code = self.0.error_code(), error = %self.0, "request rejected");
        }

        let mut body = json!({
            "success": false,
            "error": self.0.to_string(),
            "code": self.0.error_code(),
        });
        let details = self.0.details();
        if !details.is_empty() {
            body["details"] = json!(details);
        }

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            // The rest of the oversized body is never read
            response
                .headers_mut()
                .insert(header::CONNECTION, HeaderValue::from_static("close"));
        }
        response
    }
}

/// Result type for route handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_lists_details() {
        let error = BridgeError::validation_errors(vec![
            "settings.model is required".to_string(),
            "messages must be an array".to_string(),
        ]);
        let response = ApiError(error).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["code"], "BRIDGE_VALIDATION");
        assert_eq!(body["details"].as_array().unwrap().len(), 2);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_payload_too_large_closes_connection() {
        let response = ApiError(BridgeError::payload_too_large(10)).into_response();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(response.headers()[header::CONNECTION], "close");
    }

    #[tokio::test]
    async fn test_upstream_statuses() {
        for (error, status) in [
            (BridgeError::upstream_failed("x"), 502),
            (BridgeError::upstream_unavailable("x"), 503),
            (BridgeError::upstream_timeout("x"), 504),
        ] {
            let response = ApiError(error).into_response();
            assert_eq!(response.status().as_u16(), status);
            assert!(body_json(response).await.get("details").is_none());
        }
    }
}
