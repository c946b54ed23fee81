//! Streaming chat route

use crate::error::ApiResult;
use crate::extract::JsonBody;
use crate::state::AppState;
use async_stream::stream;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{HeaderValue, header};
use axum::response::Response;
use bridge_core::{AbortSignal, ChatRequest};
use futures::StreamExt;
use std::convert::Infallible;
use uuid::Uuid;

/// POST /chat
///
/// Answers with a chunked `text/plain` body. The abort guard lives inside
/// the body stream, so a client disconnect cancels the backend call.
pub async fn chat(State(state): State<AppState>, JsonBody(body): JsonBody) -> ApiResult<Response> {
    let request = ChatRequest::from_json(body)?;
    let request_id = Uuid::new_v4();
    tracing::info!(
        %request_id,
        provider = %request.settings.kind(),
        model = %request.settings.model(),
        messages = request.messages.len(),
        "chat request accepted"
    );

    let signal = AbortSignal::new();
    let guard = signal.abort_on_drop();
    let mut tokens = state.chat.stream_chat(&request, &signal);

    let body_stream = stream! {
        let _guard = guard;
        let mut chunks = 0usize;
        while let Some(item) = tokens.next().await {
            match item {
                Ok(text) => {
                    if text.is_empty() {
                        continue;
                    }
                    chunks += 1;
                    yield Ok::<Bytes, Infallible>(Bytes::from(text));
                }
                Err(e) => {
                    tracing::warn!(%request_id, error = %e, "chat stream failed");
                    yield Ok(Bytes::from(format!("\n[Error: {}]", e)));
                    break;
                }
            }
        }
        tracing::debug!(%request_id, chunks, "chat stream finished");
    };

    let mut response = Response::new(Body::from_stream(body_stream));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    Ok(response)
}
