//! Capability chat model interface
//!
//! A capability model is a chat-completion backend reachable in-process. The
//! host supplies a [`CapabilityModelProvider`]; the bridge never constructs
//! models itself.

use super::messages::ModelMessage;
use crate::error::BridgeResult;
use crate::tools::{ToolCall, ToolSchema};
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One part of a streamed model response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePart {
    Text(String),
    ToolCall(ToolCall),
}

/// Stream of response parts from a capability model
pub type ResponsePartStream = Pin<Box<dyn Stream<Item = BridgeResult<ResponsePart>> + Send>>;

/// Per-request options
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Tools the model may call; empty disables tool calling
    pub tools: Vec<ToolSchema>,
}

/// A single chat model
#[async_trait]
pub trait CapabilityModel: Send + Sync {
    fn id(&self) -> &str;

    fn family(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Start a completion
    ///
    /// The backend must stop producing parts once `cancel` fires.
    async fn send_request(
        &self,
        messages: Vec<ModelMessage>,
        options: RequestOptions,
        cancel: CancellationToken,
    ) -> BridgeResult<ResponsePartStream>;
}

/// Enumerates available capability models
#[async_trait]
pub trait CapabilityModelProvider: Send + Sync {
    /// Models matching `family`, or every model when `family` is `None`
    async fn select_models(&self, family: Option<&str>) -> BridgeResult<Vec<Arc<dyn CapabilityModel>>>;
}

/// Provider used when no capability backend is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableCapabilityProvider;

#[async_trait]
impl CapabilityModelProvider for UnavailableCapabilityProvider {
    async fn select_models(&self, _family: Option<&str>) -> BridgeResult<Vec<Arc<dyn CapabilityModel>>> {
        Ok(Vec::new())
    }
}

/// Outcome of [`resolve_model`]
pub enum ModelLookup {
    Found(Arc<dyn CapabilityModel>),
    /// Nothing matched; carries every model that is available
    Missing(Vec<Arc<dyn CapabilityModel>>),
}

/// Find a model for `requested`
///
/// An exact family match wins. Otherwise every model is searched for a
/// case-insensitive substring match on id or family.
pub async fn resolve_model(
    provider: &dyn CapabilityModelProvider,
    requested: &str,
) -> BridgeResult<ModelLookup> {
    if let Some(model) = provider.select_models(Some(requested)).await?.into_iter().next() {
        return Ok(ModelLookup::Found(model));
    }

    let all = provider.select_models(None).await?;
    let needle = requested.to_lowercase();
    let found = all.iter().find(|model| {
        model.id().to_lowercase().contains(&needle) || model.family().to_lowercase().contains(&needle)
    });

    Ok(match found {
        Some(model) => ModelLookup::Found(Arc::clone(model)),
        None => ModelLookup::Missing(all),
    })
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted capability models shared by relay and agent tests

    use super::*;
    use crate::error::BridgeError;
    use parking_lot::Mutex;

    /// Model that replays one scripted response per invocation
    pub struct ScriptedModel {
        pub id: String,
        pub family: String,
        script: Mutex<Vec<Vec<ResponsePart>>>,
        repeat_last: bool,
        pub calls: Mutex<Vec<(Vec<ModelMessage>, RequestOptions)>>,
        fail: bool,
    }

    impl ScriptedModel {
        pub fn new(id: &str, family: &str, script: Vec<Vec<ResponsePart>>) -> Self {
            Self {
                id: id.to_string(),
                family: family.to_string(),
                script: Mutex::new(script),
                repeat_last: false,
                calls: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        /// Replay the final scripted round forever
        pub fn repeating(mut self) -> Self {
            self.repeat_last = true;
            self
        }

        /// Fail every request
        pub fn failing(mut self) -> Self {
            self.fail = true;
            self
        }

        pub fn invocations(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl CapabilityModel for ScriptedModel {
        fn id(&self) -> &str {
            &self.id
        }

        fn family(&self) -> &str {
            &self.family
        }

        fn name(&self) -> &str {
            &self.id
        }

        async fn send_request(
            &self,
            messages: Vec<ModelMessage>,
            options: RequestOptions,
            _cancel: CancellationToken,
        ) -> BridgeResult<ResponsePartStream> {
            self.calls.lock().push((messages, options));
            if self.fail {
                return Err(BridgeError::llm("scripted failure"));
            }
            let parts = {
                let mut script = self.script.lock();
                if self.repeat_last && script.len() == 1 {
                    script[0].clone()
                } else if script.is_empty() {
                    Vec::new()
                } else {
                    script.remove(0)
                }
            };
            Ok(Box::pin(futures::stream::iter(parts.into_iter().map(Ok))))
        }
    }

    /// Provider over a fixed set of models
    pub struct StaticProvider(pub Vec<Arc<dyn CapabilityModel>>);

    #[async_trait]
    impl CapabilityModelProvider for StaticProvider {
        async fn select_models(&self, family: Option<&str>) -> BridgeResult<Vec<Arc<dyn CapabilityModel>>> {
            Ok(self
                .0
                .iter()
                .filter(|model| family.is_none_or(|f| model.family() == f))
                .cloned()
                .collect())
        }
    }
}
