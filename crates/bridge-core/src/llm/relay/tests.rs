//! Tests for the stream relay

use super::*;
use crate::llm::capability::testing::{ScriptedModel, StaticProvider};
use crate::llm::capability::{CapabilityModel, ResponsePart, UnavailableCapabilityProvider};
use futures::StreamExt;
use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STREAM: &str = "data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n\ndata: {\"choices\":[{\"delta\":{\"content\":\"B\"}}]}\n\ndata: [DONE]\n\n";

async fn collect(stream: TokenStream) -> Vec<String> {
    stream
        .map(|item| item.expect("relay yielded an error"))
        .collect()
        .await
}

fn chunked(parts: Vec<Vec<u8>>) -> impl Stream<Item = Result<Vec<u8>, Infallible>> + Send + 'static {
    futures::stream::iter(parts.into_iter().map(Ok))
}

fn sse_tokens(parts: Vec<Vec<u8>>) -> TokenStream {
    relay_sse_bytes(
        chunked(parts),
        AbortSignal::new().bind(),
        Duration::from_secs(30),
    )
}

/// Marks `dropped` once the wrapped stream is dropped
struct DropFlag<S> {
    inner: S,
    dropped: Arc<AtomicBool>,
}

impl<S> Drop for DropFlag<S> {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

impl<S: Stream + Unpin> Stream for DropFlag<S> {
    type Item = S::Item;

    fn poll_next(
        mut self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

#[tokio::test]
async fn test_split_anywhere_yields_exactly_a_then_b() {
    let bytes = STREAM.as_bytes();
    for split in 1..bytes.len() {
        let tokens = collect(sse_tokens(vec![bytes[..split].to_vec(), bytes[split..].to_vec()])).await;
        assert_eq!(tokens, vec!["A", "B"], "split at {split}");
    }

    let single_bytes: Vec<Vec<u8>> = bytes.iter().map(|b| vec![*b]).collect();
    assert_eq!(collect(sse_tokens(single_bytes)).await, vec!["A", "B"]);
}

#[tokio::test]
async fn test_malformed_line_is_skipped() {
    let body = "data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n\
                data: {not json\n\
                data: {\"choices\":[{\"delta\":{\"content\":\"B\"}}]}\n\
                data: [DONE]\n";
    let tokens = collect(sse_tokens(vec![body.as_bytes().to_vec()])).await;
    assert_eq!(tokens, vec!["A", "B"]);
}

#[tokio::test]
async fn test_done_stops_reading() {
    let body = "data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\ndata: [DONE]\ndata: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n";
    let tokens = collect(sse_tokens(vec![body.as_bytes().to_vec()])).await;
    assert_eq!(tokens, vec!["A"]);
}

#[tokio::test]
async fn test_unterminated_trailing_line_is_flushed() {
    let body = "data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}";
    let tokens = collect(sse_tokens(vec![body.as_bytes().to_vec()])).await;
    assert_eq!(tokens, vec!["A"]);
}

#[tokio::test]
async fn test_abort_stops_emission_and_drops_the_read() {
    let signal = AbortSignal::new();
    let dropped = Arc::new(AtomicBool::new(false));
    let first = b"data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n".to_vec();
    let bytes = DropFlag {
        inner: chunked(vec![first]).chain(futures::stream::pending()),
        dropped: Arc::clone(&dropped),
    };

    let mut tokens = relay_sse_bytes(bytes, signal.bind(), Duration::from_secs(30));
    assert_eq!(tokens.next().await.unwrap().unwrap(), "A");

    signal.abort();
    assert!(tokens.next().await.is_none());
    assert!(dropped.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn test_stalled_read_reports_timeout() {
    let first = b"data: {\"choices\":[{\"delta\":{\"content\":\"A\"}}]}\n".to_vec();
    let bytes = chunked(vec![first]).chain(futures::stream::pending());

    let tokens = collect(relay_sse_bytes(bytes, AbortSignal::new().bind(), Duration::from_secs(30))).await;
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], "A");
    assert!(tokens[1].contains("30 seconds"));
}

#[test]
fn test_completions_url_normalization() {
    for endpoint in [
        "http://localhost:11434",
        "http://localhost:11434/",
        "http://localhost:11434/v1",
        "http://localhost:11434/v1/",
    ] {
        assert_eq!(
            completions_url(endpoint),
            "http://localhost:11434/v1/chat/completions"
        );
    }
}

#[tokio::test]
async fn test_remote_happy_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({"model": "llama3", "stream": true})))
        .respond_with(ResponseTemplate::new(200).set_body_raw(STREAM, "text/event-stream"))
        .mount(&server)
        .await;

    let relay = StreamRelay::new(Arc::new(UnavailableCapabilityProvider));
    let tokens = collect(relay.remote_stream(
        &server.uri(),
        "llama3",
        vec![ModelMessage::user("hi")],
        &AbortSignal::new(),
    ))
    .await;
    assert_eq!(tokens, vec!["A", "B"]);
}

#[tokio::test]
async fn test_remote_error_status_is_diagnostic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let relay = StreamRelay::new(Arc::new(UnavailableCapabilityProvider));
    let tokens = collect(relay.remote_stream(
        &format!("{}/v1", server.uri()),
        "llama3",
        vec![ModelMessage::user("hi")],
        &AbortSignal::new(),
    ))
    .await;
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].contains("500"));
    assert!(tokens[0].contains("model not loaded"));
}

#[tokio::test]
async fn test_remote_slow_headers_time_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(STREAM, "text/event-stream")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let relay = StreamRelay::new(Arc::new(UnavailableCapabilityProvider))
        .with_remote_timeout(Duration::from_millis(200));
    let tokens = collect(relay.remote_stream(
        &server.uri(),
        "llama3",
        vec![ModelMessage::user("hi")],
        &AbortSignal::new(),
    ))
    .await;
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].contains("did not respond"));
}

#[tokio::test]
async fn test_remote_cancel_before_headers_is_silent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let signal = AbortSignal::new();
    let relay = StreamRelay::new(Arc::new(UnavailableCapabilityProvider));
    let stream = relay.remote_stream(&server.uri(), "llama3", vec![ModelMessage::user("hi")], &signal);

    let canceller = signal.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.abort();
    });
    assert!(collect(stream).await.is_empty());
}

#[tokio::test]
async fn test_capability_streams_text_in_order() {
    let model = Arc::new(ScriptedModel::new(
        "gpt-4o-mini",
        "gpt-4o",
        vec![vec![
            ResponsePart::Text("Hel".to_string()),
            ResponsePart::Text("lo".to_string()),
        ]],
    ));
    let shared: Arc<dyn CapabilityModel> = model.clone();
    let relay = StreamRelay::new(Arc::new(StaticProvider(vec![shared])));

    let tokens = collect(relay.capability_stream("gpt-4o", vec![ModelMessage::user("hi")], &AbortSignal::new())).await;
    assert_eq!(tokens, vec!["Hel", "lo"]);
    assert!(model.calls.lock()[0].1.tools.is_empty());
}

#[tokio::test]
async fn test_capability_missing_model_lists_available() {
    let model: Arc<dyn CapabilityModel> = Arc::new(ScriptedModel::new("claude-sonnet", "claude", vec![]));
    let relay = StreamRelay::new(Arc::new(StaticProvider(vec![model])));

    let tokens = collect(relay.capability_stream("gemini", vec![ModelMessage::user("hi")], &AbortSignal::new())).await;
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].contains("\"gemini\" is not available"));
    assert!(tokens[0].contains("claude-sonnet (claude)"));
}

#[tokio::test]
async fn test_capability_without_backend_explains() {
    let relay = StreamRelay::new(Arc::new(UnavailableCapabilityProvider));
    let tokens = collect(relay.capability_stream("gpt-4o", vec![], &AbortSignal::new())).await;
    assert!(tokens[0].contains("no chat models are installed"));
}

#[tokio::test]
async fn test_capability_backend_error_surfaces_as_err() {
    let model: Arc<dyn CapabilityModel> = Arc::new(ScriptedModel::new("gpt-4o", "gpt-4o", vec![]).failing());
    let relay = StreamRelay::new(Arc::new(StaticProvider(vec![model])));

    let items: Vec<_> = relay
        .capability_stream("gpt-4o", vec![], &AbortSignal::new())
        .collect()
        .await;
    assert_eq!(items.len(), 1);
    assert!(items[0].is_err());
}
