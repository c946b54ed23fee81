//! Streaming relay over both backend protocols
//!
//! Each protocol produces a [`TokenStream`]: single pass, lazy, and bound
//! to the caller's [`AbortSignal`]. Backend problems the caller should read
//! (unknown model, HTTP error status, timeout) arrive as ordinary text;
//! only unexpected failures surface as `Err` items.

mod capability;
mod remote;

pub use remote::{completions_url, relay_sse_bytes};

use super::capability::CapabilityModelProvider;
use super::messages::ModelMessage;
use crate::cancel::{AbortSignal, CancellationBinding};
use crate::config::timeouts;
use crate::error::BridgeResult;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Normalized token stream returned to the gateway
pub type TokenStream = Pin<Box<dyn Stream<Item = BridgeResult<String>> + Send>>;

/// Entry point for single-shot completions
#[derive(Clone)]
pub struct StreamRelay {
    provider: Arc<dyn CapabilityModelProvider>,
    http: reqwest::Client,
    remote_timeout: Duration,
}

impl std::fmt::Debug for StreamRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamRelay")
            .field("remote_timeout", &self.remote_timeout)
            .finish_non_exhaustive()
    }
}

impl StreamRelay {
    pub fn new(provider: Arc<dyn CapabilityModelProvider>) -> Self {
        Self {
            provider,
            http: reqwest::Client::new(),
            remote_timeout: timeouts::remote::stream_timeout(),
        }
    }

    /// Override the remote header/read timeout
    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    /// Use a preconfigured HTTP client for remote requests
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn provider(&self) -> &Arc<dyn CapabilityModelProvider> {
        &self.provider
    }

    pub fn remote_timeout(&self) -> Duration {
        self.remote_timeout
    }

    /// Stream a completion from a capability model selected by `family`
    pub fn capability_stream(
        &self,
        family: &str,
        messages: Vec<ModelMessage>,
        signal: &AbortSignal,
    ) -> TokenStream {
        self.capability_stream_bound(family, messages, signal.bind())
    }

    /// Same as [`capability_stream`](Self::capability_stream) with an
    /// existing binding, which is released when the stream ends
    pub(crate) fn capability_stream_bound(
        &self,
        family: &str,
        messages: Vec<ModelMessage>,
        binding: CancellationBinding,
    ) -> TokenStream {
        capability::stream(Arc::clone(&self.provider), family.to_string(), messages, binding)
    }

    /// Stream a completion from a remote OpenAI-compatible endpoint
    pub fn remote_stream(
        &self,
        endpoint: &str,
        model: &str,
        messages: Vec<ModelMessage>,
        signal: &AbortSignal,
    ) -> TokenStream {
        remote::stream(
            self.http.clone(),
            completions_url(endpoint),
            model.to_string(),
            messages,
            self.remote_timeout,
            signal.bind(),
        )
    }
}

/// Diagnostic shown when no capability model matches
pub(crate) fn missing_model_message(requested: &str, available: &[String]) -> String {
    if available.is_empty() {
        format!(
            "Model \"{}\" is not available: no chat models are installed. \
             Configure a capability backend and try again.",
            requested
        )
    } else {
        format!(
            "Model \"{}\" is not available. Available models: {}",
            requested,
            available.join(", ")
        )
    }
}

#[cfg(test)]
mod tests;
