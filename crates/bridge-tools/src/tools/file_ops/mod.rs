//! Workspace file tools

mod create;
mod read;
mod search;

pub use create::{CreateFileTool, FILE_PAYLOAD_END, encode_file_payload};
pub use read::ReadFileTool;
pub use search::SearchWorkspaceTool;
