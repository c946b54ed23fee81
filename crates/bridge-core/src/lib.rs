//! Copilot Bridge Core Library
//!
//! This crate provides the core of the bridge: request types and validation,
//! workspace path safety, the streaming relay over both backend protocols,
//! and the bounded tool-calling loop.

pub mod agent;
pub mod cancel;
pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod tools;
pub mod types;
pub mod workspace;

// Re-export commonly used types
pub use agent::ToolLoopOrchestrator;
pub use cancel::{AbortSignal, CancellationBinding};
pub use chat::ChatService;
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult};
pub use llm::{
    CapabilityModel, CapabilityModelProvider, HttpCapabilityProvider, StreamRelay, TokenStream,
    UnavailableCapabilityProvider,
};
pub use tools::{Tool, ToolCall, ToolError, ToolExecutor, ToolResult};
pub use types::*;
pub use workspace::{LocalWorkspaceFs, Workspace, WorkspaceFs};

/// Version reported by the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
