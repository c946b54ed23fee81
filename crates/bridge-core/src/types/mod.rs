//! Wire types shared by the gateway and the chat pipeline

mod chat;
pub mod validation;

pub use chat::{
    ChatMessage, ChatRequest, ChatRole, ChatSettings, ModelInfo, OperationMode, ProviderKind,
};
pub use validation::Validator;
