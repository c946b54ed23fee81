//! Provider dispatch for chat requests

use crate::agent::{ToolLoopOrchestrator, decode_screenshot};
use crate::cancel::AbortSignal;
use crate::error::BridgeResult;
use crate::llm::prompt::build_messages;
use crate::llm::{MessagePart, ModelMessage, ModelRole, StreamRelay, TokenStream};
use crate::tools::ToolExecutor;
use crate::types::{ChatRequest, ChatSettings, ModelInfo, ProviderKind};
use std::sync::Arc;

/// Routes each chat request to the relay or the tool loop
#[derive(Debug, Clone)]
pub struct ChatService {
    relay: StreamRelay,
    orchestrator: ToolLoopOrchestrator,
}

impl ChatService {
    pub fn new(relay: StreamRelay, executor: Arc<ToolExecutor>) -> Self {
        let orchestrator = ToolLoopOrchestrator::new(relay.clone(), executor);
        Self { relay, orchestrator }
    }

    pub fn relay(&self) -> &StreamRelay {
        &self.relay
    }

    /// Start streaming the response for `request`
    pub fn stream_chat(&self, request: &ChatRequest, signal: &AbortSignal) -> TokenStream {
        tracing::debug!(
            provider = %request.settings.kind(),
            model = %request.settings.model(),
            messages = request.messages.len(),
            "dispatching chat request"
        );

        match &request.settings {
            ChatSettings::CapabilityModel { model } => {
                self.relay
                    .capability_stream(model, build_messages(request, false), signal)
            }
            ChatSettings::CapabilityModelAgentic { model } => {
                if request.wants_agent() {
                    let mut messages = build_messages(request, true);
                    if let Some(screenshot) = request.screenshot.as_deref() {
                        attach_screenshot(&mut messages, screenshot);
                    }
                    self.orchestrator.run(model, messages, signal)
                } else {
                    self.relay
                        .capability_stream(model, build_messages(request, false), signal)
                }
            }
            ChatSettings::RemoteCompatible { endpoint, model } => {
                self.relay
                    .remote_stream(endpoint, model, build_messages(request, false), signal)
            }
        }
    }

    /// Enumerate capability models for `GET /models`
    pub async fn list_models(&self) -> BridgeResult<Vec<ModelInfo>> {
        let models = self.relay.provider().select_models(None).await?;
        Ok(models
            .iter()
            .map(|model| ModelInfo {
                provider: ProviderKind::CapabilityModel.as_str().to_string(),
                id: model.id().to_string(),
                display_name: model.name().to_string(),
            })
            .collect())
    }
}

/// Attach a verified screenshot to the latest user turn
fn attach_screenshot(messages: &mut [ModelMessage], screenshot: &str) {
    if screenshot.trim().is_empty() {
        return;
    }
    let Some(image) = decode_screenshot(screenshot) else {
        return;
    };
    if let Some(last_user) = messages.iter_mut().rev().find(|m| m.role == ModelRole::User) {
        last_user.parts.push(MessagePart::Image(image));
    }
}
