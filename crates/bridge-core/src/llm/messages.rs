//! Backend-facing conversation entries

use crate::tools::{ToolCall, ToolResult};
use crate::types::{ChatMessage, ChatRole};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Role of a [`ModelMessage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelRole {
    System,
    User,
    Assistant,
}

impl From<ChatRole> for ModelRole {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::System => ModelRole::System,
            ChatRole::User => ModelRole::User,
            ChatRole::Assistant => ModelRole::Assistant,
        }
    }
}

impl ModelRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelRole::System => "system",
            ModelRole::User => "user",
            ModelRole::Assistant => "assistant",
        }
    }
}

/// Verified image bytes attached to a user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub mime_type: String,
    pub data: Vec<u8>,
}

impl ImageAttachment {
    /// `data:` URL form understood by OpenAI-compatible backends
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}

/// One part of a message
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePart {
    Text(String),
    ToolCall(ToolCall),
    /// Outcome of the tool call with the same `call_id`
    ToolResult { call_id: String, content: String },
    Image(ImageAttachment),
}

impl From<&ToolResult> for MessagePart {
    fn from(result: &ToolResult) -> Self {
        let content = if result.success {
            result.result.clone()
        } else {
            format!("Error: {}", result.result)
        };
        MessagePart::ToolResult {
            call_id: result.call_id.clone(),
            content,
        }
    }
}

/// A conversation entry sent to a backend
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMessage {
    pub role: ModelRole,
    pub parts: Vec<MessagePart>,
}

impl ModelMessage {
    pub fn new(role: ModelRole, parts: Vec<MessagePart>) -> Self {
        Self { role, parts }
    }

    pub fn text(role: ModelRole, text: impl Into<String>) -> Self {
        Self::new(role, vec![MessagePart::Text(text.into())])
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::text(ModelRole::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::text(ModelRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text(ModelRole::Assistant, text)
    }

    /// Concatenated text parts
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                MessagePart::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.parts.iter().filter_map(|part| match part {
            MessagePart::ToolCall(call) => Some(call),
            _ => None,
        })
    }
}

impl From<&ChatMessage> for ModelMessage {
    fn from(message: &ChatMessage) -> Self {
        ModelMessage::text(message.role.into(), message.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_conversion_keeps_role() {
        let message = ModelMessage::from(&ChatMessage::assistant("done"));
        assert_eq!(message.role, ModelRole::Assistant);
        assert_eq!(message.text_content(), "done");
    }

    #[test]
    fn test_failed_tool_result_is_marked() {
        let part = MessagePart::from(&ToolResult::error("c1", "read_file", "missing"));
        assert_eq!(
            part,
            MessagePart::ToolResult {
                call_id: "c1".to_string(),
                content: "Error: missing".to_string()
            }
        );
    }

    #[test]
    fn test_image_data_url() {
        let image = ImageAttachment {
            mime_type: "image/png".to_string(),
            data: b"hello".to_vec(),
        };
        assert_eq!(image.to_data_url(), "data:image/png;base64,aGVsbG8=");
    }
}
