//! Bounded tool-calling loop

use crate::cancel::AbortSignal;
use crate::error::BridgeError;
use crate::llm::capability::{ModelLookup, RequestOptions, ResponsePart, resolve_model};
use crate::llm::relay::missing_model_message;
use crate::llm::{MessagePart, ModelMessage, ModelRole, StreamRelay, TokenStream};
use crate::tools::{ToolCall, ToolExecutor, ToolResult};
use async_stream::stream;
use futures::StreamExt;
use std::sync::Arc;

/// Maximum model invocations per request
pub const MAX_ROUNDS: usize = 5;

/// Model family used when the loop fails part-way
pub const FALLBACK_FAMILY: &str = "gpt-4o";

const SUMMARY_CHARS: usize = 120;

/// Drives a capability model through rounds of tool calls
///
/// Each round streams the model's text straight to the caller and buffers
/// its tool calls. A round without tool calls ends the loop. Otherwise the
/// calls run one at a time in arrival order, a progress line is emitted for
/// each, and the calls and their results are appended to the conversation
/// before the next round.
#[derive(Debug, Clone)]
pub struct ToolLoopOrchestrator {
    relay: StreamRelay,
    executor: Arc<ToolExecutor>,
}

impl ToolLoopOrchestrator {
    pub fn new(relay: StreamRelay, executor: Arc<ToolExecutor>) -> Self {
        Self { relay, executor }
    }

    pub fn executor(&self) -> &Arc<ToolExecutor> {
        &self.executor
    }

    /// Run the loop for `family` over `messages`
    ///
    /// One cancellation binding covers every round and the fallback; it is
    /// released once, when the returned stream ends or is dropped.
    #[tracing::instrument(skip_all, fields(family = %family))]
    pub fn run(&self, family: &str, messages: Vec<ModelMessage>, signal: &AbortSignal) -> TokenStream {
        let binding = signal.bind();
        let relay = self.relay.clone();
        let executor = Arc::clone(&self.executor);
        let family = family.to_string();

        Box::pin(stream! {
            let model = match resolve_model(relay.provider().as_ref(), &family).await {
                Ok(ModelLookup::Found(model)) => model,
                Ok(ModelLookup::Missing(available)) => {
                    let names: Vec<String> = available
                        .iter()
                        .map(|m| format!("{} ({})", m.id(), m.family()))
                        .collect();
                    yield Ok(missing_model_message(&family, &names));
                    return;
                }
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let options = RequestOptions {
                tools: executor.schemas(),
            };
            let mut conversation = messages.clone();
            let mut round = 0;

            let failure: Option<BridgeError> = 'tool_loop: loop {
                round += 1;
                tracing::debug!(round, model = %model.id(), "invoking model");

                let mut parts = match model
                    .send_request(conversation.clone(), options.clone(), binding.token().clone())
                    .await
                {
                    Ok(parts) => parts,
                    Err(e) => break 'tool_loop Some(e),
                };

                let mut text = String::new();
                let mut calls: Vec<ToolCall> = Vec::new();
                loop {
                    let next = tokio::select! {
                        biased;
                        _ = binding.cancelled() => None,
                        next = parts.next() => next,
                    };
                    match next {
                        Some(Ok(ResponsePart::Text(chunk))) => {
                            text.push_str(&chunk);
                            yield Ok(chunk);
                        }
                        Some(Ok(ResponsePart::ToolCall(call))) => calls.push(call),
                        Some(Err(e)) => break 'tool_loop Some(e),
                        None => break,
                    }
                }

                if binding.is_cancelled() {
                    tracing::debug!(round, "tool loop cancelled");
                    break 'tool_loop None;
                }
                if calls.is_empty() {
                    break 'tool_loop None;
                }
                if round >= MAX_ROUNDS {
                    tracing::warn!(
                        rounds = MAX_ROUNDS,
                        skipped = calls.len(),
                        "tool loop hit round limit"
                    );
                    yield Ok(format!(
                        "\n\n[Stopped after {} rounds of tool use; {} pending tool call(s) were not run]\n",
                        MAX_ROUNDS,
                        calls.len()
                    ));
                    break 'tool_loop None;
                }

                let mut results: Vec<ToolResult> = Vec::with_capacity(calls.len());
                for call in &calls {
                    let result = executor.execute_tool(call).await;
                    yield Ok(progress_line(call, &result));
                    results.push(result);
                    if binding.is_cancelled() {
                        break 'tool_loop None;
                    }
                }

                let mut assistant_parts = Vec::with_capacity(calls.len() + 1);
                if !text.is_empty() {
                    assistant_parts.push(MessagePart::Text(text));
                }
                assistant_parts.extend(calls.into_iter().map(MessagePart::ToolCall));
                conversation.push(ModelMessage::new(ModelRole::Assistant, assistant_parts));
                conversation.push(ModelMessage::new(
                    ModelRole::User,
                    results.iter().map(MessagePart::from).collect(),
                ));
            };

            if let Some(error) = failure {
                tracing::warn!(error = %error, round, "tool loop failed, falling back to single-shot completion");
                let mut fallback = relay.capability_stream_bound(FALLBACK_FAMILY, messages, binding);
                while let Some(item) = fallback.next().await {
                    yield item;
                }
            }
        })
    }
}

fn progress_line(call: &ToolCall, result: &ToolResult) -> String {
    let status = if result.success { "done" } else { "failed" };
    format!(
        "\n\n> Tool `{}` {}: {}\n\n",
        call.name,
        status,
        result.summary(SUMMARY_CHARS)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::capability::testing::{ScriptedModel, StaticProvider};
    use crate::llm::{CapabilityModel, CapabilityModelProvider};
    use crate::tools::{Tool, ToolError, ToolSchema};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    struct RecordingTool {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Tool for RecordingTool {
        fn name(&self) -> &str {
            "read_file"
        }
        fn description(&self) -> &str {
            "Read a file"
        }
        fn schema(&self) -> ToolSchema {
            ToolSchema::new(self.name(), self.description(), vec![])
        }
        async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
            self.seen.lock().push(call.id.clone());
            Ok(ToolResult::success(&call.id, self.name(), format!("contents for {}", call.id)))
        }
    }

    fn tool_call(id: &str) -> ResponsePart {
        ResponsePart::ToolCall(ToolCall::new(id, "read_file").with_param("path", "a.txt"))
    }

    fn text(t: &str) -> ResponsePart {
        ResponsePart::Text(t.to_string())
    }

    fn setup(models: &[Arc<ScriptedModel>]) -> (ToolLoopOrchestrator, Arc<RecordingTool>) {
        let tool = Arc::new(RecordingTool {
            seen: Mutex::new(Vec::new()),
        });
        let models: Vec<Arc<dyn CapabilityModel>> = models
            .iter()
            .map(|model| Arc::clone(model) as Arc<dyn CapabilityModel>)
            .collect();
        let provider: Arc<dyn CapabilityModelProvider> = Arc::new(StaticProvider(models));
        let executor = Arc::new(ToolExecutor::with_tools(vec![tool.clone()]));
        (ToolLoopOrchestrator::new(StreamRelay::new(provider), executor), tool)
    }

    async fn run(orchestrator: &ToolLoopOrchestrator, family: &str) -> Vec<String> {
        orchestrator
            .run(family, vec![ModelMessage::user("go")], &AbortSignal::new())
            .map(|item| item.unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn test_always_calling_model_stops_after_five_rounds() {
        let model = Arc::new(
            ScriptedModel::new("agent", "gpt-4o", vec![vec![text("working"), tool_call("c")]]).repeating(),
        );
        let (orchestrator, tool) = setup(&[model.clone()]);

        let output = run(&orchestrator, "gpt-4o").await;

        assert_eq!(model.invocations(), MAX_ROUNDS);
        assert_eq!(tool.seen.lock().len(), MAX_ROUNDS - 1);
        assert!(output.last().unwrap().contains("Stopped after 5 rounds"));
    }

    #[tokio::test]
    async fn test_no_tool_calls_finishes_after_one_round() {
        let model = Arc::new(ScriptedModel::new("agent", "gpt-4o", vec![vec![text("Hi "), text("there")]]));
        let (orchestrator, tool) = setup(&[model.clone()]);

        assert_eq!(run(&orchestrator, "gpt-4o").await, vec!["Hi ", "there"]);
        assert_eq!(model.invocations(), 1);
        assert!(tool.seen.lock().is_empty());
        assert_eq!(model.calls.lock()[0].1.tools[0].name, "read_file");
    }

    #[tokio::test]
    async fn test_tool_results_are_fed_back_in_order() {
        let model = Arc::new(ScriptedModel::new(
            "agent",
            "gpt-4o",
            vec![
                vec![text("Reading"), tool_call("first"), tool_call("second")],
                vec![text("All done")],
            ],
        ));
        let (orchestrator, tool) = setup(&[model.clone()]);

        let output = run(&orchestrator, "gpt-4o").await;

        assert_eq!(*tool.seen.lock(), vec!["first", "second"]);
        assert_eq!(output.first().unwrap(), "Reading");
        assert!(output[1].contains("Tool `read_file` done"));
        assert_eq!(output.last().unwrap(), "All done");

        let calls = model.calls.lock();
        let second_round = &calls[1].0;
        assert_eq!(second_round.len(), 3);
        let assistant = &second_round[1];
        assert_eq!(assistant.role, ModelRole::Assistant);
        assert_eq!(assistant.text_content(), "Reading");
        assert_eq!(assistant.tool_calls().count(), 2);
        let results = &second_round[2];
        assert_eq!(results.role, ModelRole::User);
        assert_eq!(
            results.parts[1],
            MessagePart::ToolResult {
                call_id: "second".to_string(),
                content: "contents for second".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_default_family() {
        let broken = Arc::new(ScriptedModel::new("broken", "claude", vec![]).failing());
        let fallback = Arc::new(ScriptedModel::new("default", FALLBACK_FAMILY, vec![vec![text("fallback answer")]]));
        let (orchestrator, _) = setup(&[broken, fallback.clone()]);

        let output = run(&orchestrator, "claude").await;

        assert_eq!(output, vec!["fallback answer"]);
        assert!(fallback.calls.lock()[0].1.tools.is_empty());
    }

    #[tokio::test]
    async fn test_missing_model_is_diagnostic() {
        let (orchestrator, _) = setup(&[]);
        let output = run(&orchestrator, "gpt-4o").await;
        assert_eq!(output.len(), 1);
        assert!(output[0].contains("is not available"));
    }

    #[tokio::test]
    async fn test_abort_before_start_runs_nothing() {
        let model = Arc::new(ScriptedModel::new("agent", "gpt-4o", vec![vec![tool_call("c")]]).repeating());
        let (orchestrator, tool) = setup(&[model.clone()]);
        let signal = AbortSignal::new();
        signal.abort();

        let output: Vec<_> = orchestrator
            .run("gpt-4o", vec![ModelMessage::user("go")], &signal)
            .collect()
            .await;

        assert!(output.is_empty());
        assert!(model.invocations() <= 1);
        assert!(tool.seen.lock().is_empty());
    }
}
