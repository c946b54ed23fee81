//! Chat request types

use super::validation::Validator;
use crate::error::BridgeResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider tags accepted in `settings.provider`
pub const PROVIDER_TAGS: &[&str] = &[
    ProviderKind::CAPABILITY,
    ProviderKind::CAPABILITY_AGENTIC,
    ProviderKind::REMOTE,
];

/// Provider kind without its configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    CapabilityModel,
    CapabilityModelAgentic,
    RemoteCompatible,
}

impl ProviderKind {
    pub const CAPABILITY: &'static str = "capability-model";
    pub const CAPABILITY_AGENTIC: &'static str = "capability-model-agentic";
    pub const REMOTE: &'static str = "remote-openai-compatible";

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CapabilityModel => Self::CAPABILITY,
            Self::CapabilityModelAgentic => Self::CAPABILITY_AGENTIC,
            Self::RemoteCompatible => Self::REMOTE,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend selection for one chat request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "provider")]
pub enum ChatSettings {
    /// In-process capability model, single shot
    #[serde(rename = "capability-model")]
    CapabilityModel { model: String },
    /// In-process capability model driving the tool loop
    #[serde(rename = "capability-model-agentic")]
    CapabilityModelAgentic { model: String },
    /// Remote OpenAI-compatible SSE endpoint
    #[serde(rename = "remote-openai-compatible")]
    RemoteCompatible { endpoint: String, model: String },
}

impl ChatSettings {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::CapabilityModel { .. } => ProviderKind::CapabilityModel,
            Self::CapabilityModelAgentic { .. } => ProviderKind::CapabilityModelAgentic,
            Self::RemoteCompatible { .. } => ProviderKind::RemoteCompatible,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            Self::CapabilityModel { model }
            | Self::CapabilityModelAgentic { model }
            | Self::RemoteCompatible { model, .. } => model,
        }
    }

    fn validate(value: &Value, v: &mut Validator) {
        let Some(settings) = v.object(value, "settings") else {
            return;
        };
        let Some(provider) = v.one_of(settings, "provider", "settings", PROVIDER_TAGS) else {
            return;
        };
        v.non_empty_string(settings, "model", "settings");
        if provider == ProviderKind::REMOTE {
            if let Some(endpoint) = v.non_empty_string(settings, "endpoint", "settings") {
                match reqwest::Url::parse(endpoint.trim()) {
                    Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                    Ok(url) => v.reject(
                        "settings.endpoint",
                        format!("must use http or https (got \"{}\")", url.scheme()),
                    ),
                    Err(e) => v.reject("settings.endpoint", format!("is not a valid URL: {}", e)),
                }
            }
        }
    }
}

/// Conversation role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl std::fmt::Display for ChatRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatRole::User => write!(f, "user"),
            ChatRole::Assistant => write!(f, "assistant"),
            ChatRole::System => write!(f, "system"),
        }
    }
}

/// One entry of the conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }
}

/// How the caller wants an agentic provider to behave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationMode {
    /// Plain completion, no tools
    Chat,
    /// Tool loop
    Agent,
}

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub settings: ChatSettings,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub page_content: String,
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub operation_mode: Option<OperationMode>,
}

impl ChatRequest {
    /// Validate a JSON body field by field, then deserialize it
    pub fn from_json(value: Value) -> BridgeResult<Self> {
        Self::validate(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Check the body against the request schema
    pub fn validate(value: &Value) -> BridgeResult<()> {
        let mut v = Validator::new();
        let Some(body) = v.object(value, "body") else {
            return v.finish();
        };

        match body.get("settings") {
            Some(settings) => ChatSettings::validate(settings, &mut v),
            None => v.reject("settings", "is required"),
        }

        if let Some(messages) = v.array(body, "messages", "") {
            for (index, message) in messages.iter().enumerate() {
                let path = format!("messages[{}]", index);
                let Some(entry) = v.object(message, &path) else {
                    continue;
                };
                v.one_of(entry, "role", &path, &["user", "assistant", "system"]);
                match entry.get("content") {
                    Some(Value::String(_)) => {}
                    None | Some(Value::Null) => v.reject(&format!("{}.content", path), "is required"),
                    Some(_) => v.reject(&format!("{}.content", path), "must be a string"),
                }
            }
        }

        v.optional_string(body, "pageContent", "");
        v.optional_string(body, "screenshot", "");
        if body.get("operationMode").is_some_and(|m| !m.is_null()) {
            v.one_of(body, "operationMode", "", &["chat", "agent"]);
        }

        v.finish()
    }

    /// Whether the tool loop should run for this request
    pub fn wants_agent(&self) -> bool {
        matches!(self.settings, ChatSettings::CapabilityModelAgentic { .. })
            && self.operation_mode != Some(OperationMode::Chat)
    }
}

/// Read-only model descriptor returned by `GET /models`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub provider: String,
    pub id: String,
    pub display_name: String,
}
