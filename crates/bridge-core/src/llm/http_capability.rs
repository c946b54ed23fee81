//! OpenAI-compatible endpoint presented as capability models
//!
//! Lets the bridge run standalone: each configured model becomes a
//! [`CapabilityModel`] whose completions, including streamed tool calls,
//! come from `{endpoint}/v1/chat/completions`.

use super::capability::{
    CapabilityModel, CapabilityModelProvider, RequestOptions, ResponsePart, ResponsePartStream,
};
use super::converters::{MessageConverter, ToolConverter};
use super::messages::ModelMessage;
use super::relay::completions_url;
use super::sse_decoder::{SseLine, SseLineDecoder};
use crate::cancel::{Interruption, race};
use crate::config::CapabilityBackendConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::tools::ToolCall;
use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Capability provider backed by one OpenAI-compatible endpoint
pub struct HttpCapabilityProvider {
    models: Vec<Arc<HttpCapabilityModel>>,
}

impl HttpCapabilityProvider {
    pub fn from_config(config: &CapabilityBackendConfig, timeout: Duration) -> Self {
        let http = reqwest::Client::new();
        let url = completions_url(&config.endpoint);
        let api_key = config.api_key();

        let models = config
            .models
            .iter()
            .map(|model| {
                Arc::new(HttpCapabilityModel {
                    id: model.id.clone(),
                    family: model.family.clone().unwrap_or_else(|| model.id.clone()),
                    name: model.name.clone().unwrap_or_else(|| model.id.clone()),
                    url: url.clone(),
                    api_key: api_key.clone(),
                    http: http.clone(),
                    timeout,
                })
            })
            .collect();

        Self { models }
    }
}

#[async_trait]
impl CapabilityModelProvider for HttpCapabilityProvider {
    async fn select_models(&self, family: Option<&str>) -> BridgeResult<Vec<Arc<dyn CapabilityModel>>> {
        Ok(self
            .models
            .iter()
            .filter(|model| family.is_none_or(|f| model.family == f))
            .map(|model| Arc::clone(model) as Arc<dyn CapabilityModel>)
            .collect())
    }
}

struct HttpCapabilityModel {
    id: String,
    family: String,
    name: String,
    url: String,
    api_key: Option<String>,
    http: reqwest::Client,
    timeout: Duration,
}

#[async_trait]
impl CapabilityModel for HttpCapabilityModel {
    fn id(&self) -> &str {
        &self.id
    }

    fn family(&self) -> &str {
        &self.family
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn send_request(
        &self,
        messages: Vec<ModelMessage>,
        options: RequestOptions,
        cancel: CancellationToken,
    ) -> BridgeResult<ResponsePartStream> {
        let mut body = json!({
            "model": self.id,
            "messages": MessageConverter::to_openai(&messages),
            "stream": true
        });
        if !options.tools.is_empty() {
            body["tools"] = Value::Array(ToolConverter::to_openai(&options.tools));
        }

        let mut request = self.http.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = match race(&cancel, self.timeout, request.send()).await {
            Ok(response) => response?,
            Err(Interruption::Cancelled) => return Err(BridgeError::Cancelled),
            Err(Interruption::TimedOut(timeout)) => {
                return Err(BridgeError::upstream_timeout(format!(
                    "{} did not respond within {} seconds",
                    self.url,
                    timeout.as_secs()
                )));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(BridgeError::upstream_failed(format!(
                "{} returned HTTP {}: {}",
                self.url,
                status.as_u16(),
                text.trim()
            )));
        }

        let timeout = self.timeout;
        let mut bytes = response.bytes_stream();

        Ok(Box::pin(stream! {
            let mut decoder = SseLineDecoder::new();
            let mut pending = PendingToolCalls::default();

            'read: loop {
                let (lines, ended) = match race(&cancel, timeout, bytes.next()).await {
                    Ok(Some(Ok(chunk))) => (decoder.feed(&chunk), false),
                    Ok(Some(Err(e))) => {
                        yield Err(BridgeError::from(e));
                        return;
                    }
                    Ok(None) => (decoder.finish().into_iter().collect::<Vec<_>>(), true),
                    Err(Interruption::Cancelled) => return,
                    Err(Interruption::TimedOut(timeout)) => {
                        yield Err(BridgeError::upstream_timeout(format!(
                            "stream stalled for {} seconds",
                            timeout.as_secs()
                        )));
                        return;
                    }
                };

                for line in lines {
                    let payload = match line {
                        SseLine::Done => break 'read,
                        SseLine::Data(payload) => payload,
                    };
                    let Ok(value) = serde_json::from_str::<Value>(&payload) else {
                        tracing::warn!(line = %payload, "skipping malformed stream line");
                        continue;
                    };
                    let delta = &value["choices"][0]["delta"];
                    if let Some(text) = delta["content"].as_str().filter(|t| !t.is_empty()) {
                        yield Ok(ResponsePart::Text(text.to_string()));
                    }
                    if let Some(calls) = delta["tool_calls"].as_array() {
                        pending.absorb(calls);
                    }
                }

                if ended {
                    break;
                }
            }

            for call in pending.finish() {
                yield call.map(ResponsePart::ToolCall);
            }
        }))
    }
}

#[derive(Default)]
struct PartialCall {
    id: String,
    name: String,
    arguments: String,
}

/// Tool calls assembled from streamed fragments, keyed by `index`
#[derive(Default)]
struct PendingToolCalls {
    calls: BTreeMap<u64, PartialCall>,
}

impl PendingToolCalls {
    fn absorb(&mut self, fragments: &[Value]) {
        for (position, fragment) in fragments.iter().enumerate() {
            let index = fragment["index"].as_u64().unwrap_or(position as u64);
            let entry = self.calls.entry(index).or_default();
            if let Some(id) = fragment["id"].as_str() {
                entry.id = id.to_string();
            }
            if let Some(name) = fragment["function"]["name"].as_str() {
                entry.name.push_str(name);
            }
            if let Some(arguments) = fragment["function"]["arguments"].as_str() {
                entry.arguments.push_str(arguments);
            }
        }
    }

    fn finish(self) -> Vec<BridgeResult<ToolCall>> {
        self.calls
            .into_iter()
            .map(|(index, call)| {
                let id = if call.id.is_empty() {
                    format!("call_{}", index)
                } else {
                    call.id
                };
                ToolCall::from_json_arguments(id, call.name, &call.arguments).map_err(BridgeError::from)
            })
            .collect()
    }
}
