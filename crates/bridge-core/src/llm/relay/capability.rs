//! Capability model protocol

use super::{TokenStream, missing_model_message};
use crate::cancel::CancellationBinding;
use crate::llm::capability::{
    CapabilityModelProvider, ModelLookup, RequestOptions, ResponsePart, resolve_model,
};
use crate::llm::messages::ModelMessage;
use async_stream::stream;
use futures::StreamExt;
use std::sync::Arc;

pub(super) fn stream(
    provider: Arc<dyn CapabilityModelProvider>,
    family: String,
    messages: Vec<ModelMessage>,
    binding: CancellationBinding,
) -> TokenStream {
    Box::pin(stream! {
        let model = match resolve_model(provider.as_ref(), &family).await {
            Ok(ModelLookup::Found(model)) => model,
            Ok(ModelLookup::Missing(available)) => {
                let names: Vec<String> = available
                    .iter()
                    .map(|m| format!("{} ({})", m.id(), m.family()))
                    .collect();
                tracing::warn!(requested = %family, available = names.len(), "no capability model matched");
                yield Ok(missing_model_message(&family, &names));
                return;
            }
            Err(e) => {
                yield Err(e);
                return;
            }
        };

        tracing::debug!(model = %model.id(), requested = %family, "starting capability completion");

        let mut parts = match model
            .send_request(messages, RequestOptions::default(), binding.token().clone())
            .await
        {
            Ok(parts) => parts,
            Err(e) => {
                yield Err(e);
                return;
            }
        };

        loop {
            let next = tokio::select! {
                biased;
                _ = binding.cancelled() => None,
                next = parts.next() => next,
            };
            match next {
                Some(Ok(ResponsePart::Text(text))) => yield Ok(text),
                // No tools were offered; stray calls are ignored
                Some(Ok(ResponsePart::ToolCall(call))) => {
                    tracing::debug!(tool = %call.name, "ignoring tool call in single-shot completion");
                }
                Some(Err(e)) => {
                    yield Err(e);
                    break;
                }
                None => break,
            }
        }

        drop(binding);
    })
}
