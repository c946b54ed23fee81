//! Origin and client-header authentication
//!
//! Runs before routing and before any body is read. `/health` is public
//! but still echoes CORS headers to an allowed origin; every other path requires an allow-listed `Origin` (403 otherwise) and
//! the client header (401 otherwise). Preflight `OPTIONS` from an allowed
//! origin is answered here with 204.

use crate::error::ApiError;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bridge_core::BridgeError;

/// Header every protected request must carry
pub const CLIENT_HEADER: &str = "x-copilot-bridge-client";
/// Required value of [`CLIENT_HEADER`]
pub const CLIENT_HEADER_VALUE: &str = "chrome-extension";

pub const PUBLIC_PATH: &str = "/health";

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, X-Copilot-Bridge-Client";

pub async fn require_client(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if request.uri().path() == PUBLIC_PATH {
        let mut response = next.run(request).await;
        if let Some(origin) = origin.filter(|o| state.origins.read().allows(o)) {
            apply_cors(response.headers_mut(), &origin);
        }
        return response;
    }

    let origin = match origin {
        Some(origin) if state.origins.read().allows(&origin) => origin,
        Some(origin) => {
            tracing::warn!(%origin, path = %request.uri().path(), "rejected request from unlisted origin");
            return ApiError(BridgeError::forbidden("Origin is not allowed")).into_response();
        }
        None => {
            tracing::warn!(path = %request.uri().path(), "rejected request without origin");
            return ApiError(BridgeError::forbidden("Origin header is required")).into_response();
        }
    };

    let mut response = if request.method() == Method::OPTIONS {
        let mut preflight = Response::new(Body::empty());
        *preflight.status_mut() = StatusCode::NO_CONTENT;
        preflight
    } else if has_client_header(request.headers()) {
        next.run(request).await
    } else {
        ApiError(BridgeError::unauthorized(format!(
            "Missing or invalid {} header",
            CLIENT_HEADER
        )))
        .into_response()
    };

    apply_cors(response.headers_mut(), &origin);
    response
}

fn has_client_header(headers: &HeaderMap) -> bool {
    headers
        .get(CLIENT_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == CLIENT_HEADER_VALUE)
}

fn apply_cors(headers: &mut HeaderMap, origin: &str) {
    if let Ok(value) = HeaderValue::from_str(origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
    }
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOW_HEADERS),
    );
}
