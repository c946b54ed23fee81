//! Remote OpenAI-compatible protocol

use super::TokenStream;
use crate::cancel::{CancellationBinding, Interruption, race};
use crate::error::BridgeError;
use crate::llm::converters::MessageConverter;
use crate::llm::messages::ModelMessage;
use crate::llm::sse_decoder::{SseLine, SseLineDecoder};
use async_stream::stream;
use futures::{Stream, StreamExt};
use serde_json::{Value, json};
use std::fmt::Display;
use std::time::Duration;

/// Parse failures logged per stream before going quiet
const MAX_LOGGED_PARSE_FAILURES: usize = 3;

/// `{endpoint}/v1/chat/completions`, tolerating a trailing `/` or `/v1`
pub fn completions_url(endpoint: &str) -> String {
    let base = endpoint.trim().trim_end_matches('/');
    let base = base.strip_suffix("/v1").unwrap_or(base);
    format!("{}/v1/chat/completions", base)
}

fn timeout_message(timeout: Duration) -> String {
    format!(
        "\n[Remote endpoint did not respond within {} seconds]",
        timeout.as_secs()
    )
}

pub(super) fn stream(
    http: reqwest::Client,
    url: String,
    model: String,
    messages: Vec<ModelMessage>,
    timeout: Duration,
    binding: CancellationBinding,
) -> TokenStream {
    let body = json!({
        "model": model,
        "messages": MessageConverter::to_openai(&messages),
        "stream": true
    });

    Box::pin(stream! {
        tracing::debug!(url = %url, model = %model, "starting remote completion");

        let send = http.post(&url).json(&body).send();
        let response = match race(binding.token(), timeout, send).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                yield Err(BridgeError::upstream_unavailable(format!(
                    "Could not reach {}: {}",
                    url, e
                )));
                return;
            }
            Err(Interruption::Cancelled) => {
                tracing::debug!(url = %url, "remote request cancelled before headers");
                return;
            }
            Err(Interruption::TimedOut(timeout)) => {
                tracing::warn!(url = %url, ?timeout, "remote endpoint timed out waiting for headers");
                yield Ok(timeout_message(timeout));
                return;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = match race(binding.token(), timeout, response.text()).await {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => e.to_string(),
                Err(_) => String::new(),
            };
            tracing::warn!(url = %url, status = status.as_u16(), "remote endpoint returned error status");
            yield Ok(format!(
                "Remote endpoint returned HTTP {}: {}",
                status.as_u16(),
                text.trim()
            ));
            return;
        }

        let mut tokens = relay_sse_bytes(response.bytes_stream(), binding, timeout);
        while let Some(item) = tokens.next().await {
            yield item;
        }
    })
}

enum LineOutcome {
    Token(String),
    Done,
    Skip,
}

fn interpret(line: SseLine, parse_failures: &mut usize) -> LineOutcome {
    let payload = match line {
        SseLine::Done => return LineOutcome::Done,
        SseLine::Data(payload) => payload,
    };

    match serde_json::from_str::<Value>(&payload) {
        Ok(value) => match value["choices"][0]["delta"]["content"].as_str() {
            Some(content) if !content.is_empty() => LineOutcome::Token(content.to_string()),
            _ => LineOutcome::Skip,
        },
        Err(e) => {
            *parse_failures += 1;
            if *parse_failures <= MAX_LOGGED_PARSE_FAILURES {
                tracing::warn!(error = %e, line = %payload, "skipping malformed stream line");
            }
            LineOutcome::Skip
        }
    }
}

/// Decode an SSE byte stream into content tokens
///
/// Every read races `timeout` against the binding. Dropping the returned
/// stream drops `bytes`, which aborts the underlying HTTP read.
pub fn relay_sse_bytes<S, B, E>(bytes: S, binding: CancellationBinding, timeout: Duration) -> TokenStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    Box::pin(stream! {
        let mut bytes = Box::pin(bytes);
        let mut decoder = SseLineDecoder::new();
        let mut parse_failures = 0usize;

        'read: loop {
            let chunk = match race(binding.token(), timeout, bytes.next()).await {
                Ok(Some(Ok(chunk))) => chunk,
                Ok(Some(Err(e))) => {
                    yield Err(BridgeError::upstream_failed(format!("Stream read failed: {}", e)));
                    break;
                }
                Ok(None) => {
                    if let Some(line) = decoder.finish() {
                        if let LineOutcome::Token(token) = interpret(line, &mut parse_failures) {
                            yield Ok(token);
                        }
                    }
                    break;
                }
                Err(Interruption::Cancelled) => {
                    tracing::debug!("remote stream cancelled by caller");
                    break;
                }
                Err(Interruption::TimedOut(timeout)) => {
                    tracing::warn!(?timeout, "remote stream read timed out");
                    yield Ok(timeout_message(timeout));
                    break;
                }
            };

            for line in decoder.feed(chunk.as_ref()) {
                if binding.is_cancelled() {
                    break 'read;
                }
                match interpret(line, &mut parse_failures) {
                    LineOutcome::Token(token) => yield Ok(token),
                    LineOutcome::Done => break 'read,
                    LineOutcome::Skip => {}
                }
            }
        }

        if parse_failures > 0 {
            tracing::warn!(count = parse_failures, "remote stream contained malformed lines");
        }
        drop(bytes);
        drop(binding);
    })
}
