//! Shared state handed to every route

use crate::playwright::PlaywrightClient;
use bridge_core::ChatService;
use bridge_core::config::OriginAllowList;
use bridge_core::workspace::Workspace;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub chat: Arc<ChatService>,
    /// Absent when no workspace folder is configured
    pub workspace: Option<Workspace>,
    /// Replaced on config reload, read on every request
    pub origins: Arc<RwLock<OriginAllowList>>,
    pub playwright: PlaywrightClient,
}
