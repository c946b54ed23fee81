//! Agent mode: the bounded tool loop and screenshot intake

mod orchestrator;
pub mod screenshot;

pub use orchestrator::{FALLBACK_FAMILY, MAX_ROUNDS, ToolLoopOrchestrator};
pub use screenshot::{ImageFormat, decode_screenshot};
