//! OpenAI wire-format conversion

use super::messages::{MessagePart, ModelMessage, ModelRole};
use crate::tools::ToolSchema;
use serde_json::{Value, json};

/// Message format converter
pub struct MessageConverter;

impl MessageConverter {
    /// Convert messages for the OpenAI chat completions API
    ///
    /// Tool results become separate `tool` messages following their turn;
    /// image parts switch the content to the multi-part array form.
    pub fn to_openai(messages: &[ModelMessage]) -> Vec<Value> {
        let mut converted = Vec::with_capacity(messages.len());

        for message in messages {
            let text = message.text_content();
            let images: Vec<Value> = message
                .parts
                .iter()
                .filter_map(|part| match part {
                    MessagePart::Image(image) => Some(json!({
                        "type": "image_url",
                        "image_url": {"url": image.to_data_url()}
                    })),
                    _ => None,
                })
                .collect();
            let tool_calls: Vec<Value> = message
                .tool_calls()
                .map(|call| {
                    json!({
                        "id": call.id,
                        "type": "function",
                        "function": {
                            "name": call.name,
                            "arguments": call.arguments_json().to_string()
                        }
                    })
                })
                .collect();

            if !text.is_empty() || !images.is_empty() || !tool_calls.is_empty() {
                let content = if images.is_empty() {
                    if text.is_empty() && !tool_calls.is_empty() {
                        Value::Null
                    } else {
                        Value::String(text)
                    }
                } else {
                    let mut content = vec![json!({"type": "text", "text": text})];
                    content.extend(images);
                    Value::Array(content)
                };

                let mut msg = json!({
                    "role": message.role.as_str(),
                    "content": content
                });
                if !tool_calls.is_empty() && message.role == ModelRole::Assistant {
                    msg["tool_calls"] = Value::Array(tool_calls);
                }
                converted.push(msg);
            }

            for part in &message.parts {
                if let MessagePart::ToolResult { call_id, content } = part {
                    converted.push(json!({
                        "role": "tool",
                        "tool_call_id": call_id,
                        "content": content
                    }));
                }
            }
        }

        converted
    }
}

/// Tool format converter
pub struct ToolConverter;

impl ToolConverter {
    /// Convert tools for the OpenAI `tools` array
    pub fn to_openai(tools: &[ToolSchema]) -> Vec<Value> {
        tools.iter().map(ToolSchema::to_openai).collect()
    }
}
