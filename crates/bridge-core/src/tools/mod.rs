//! Tool abstractions shared by the agent loop and the tool implementations

mod base;
mod executor;
pub mod types;

pub use base::{Tool, ToolError};
pub use executor::ToolExecutor;
pub use types::{ParamValue, ToolCall, ToolParameter, ToolResult, ToolSchema};
