//! Error types for Copilot Bridge
//!
//! All fallible operations in the bridge return [`BridgeResult`]. Each
//! [`BridgeError`] variant carries a stable error code and the HTTP status
//! the gateway answers with, so the taxonomy lives in one place:
//! - authentication failures (401/403)
//! - validation failures with one message per rejected field (400)
//! - oversized payloads (413) and missing resources (404)
//! - upstream failures split by cause (502/503/504)
//! - everything else (500)

mod constructors;
mod conversions;
mod types;

pub use types::{BridgeError, BridgeResult, OptionExt, ResultExt, UpstreamFailure};
