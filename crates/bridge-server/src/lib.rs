//! Copilot Bridge HTTP gateway
//!
//! Serves the browser extension on `127.0.0.1`: origin and client-header
//! authentication, per-route validation, streamed chat responses, direct
//! workspace file operations and a proxy to the local browser automation
//! service.

pub mod auth;
pub mod error;
mod extract;
pub mod gateway;
pub mod playwright;
mod routes;
pub mod state;

pub use auth::{CLIENT_HEADER, CLIENT_HEADER_VALUE};
pub use error::{ApiError, ApiResult};
pub use gateway::Gateway;
pub use playwright::PlaywrightClient;
pub use routes::create_router;
pub use state::AppState;
