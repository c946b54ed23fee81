//! The gateway object: owns the listener task, the config snapshot and the
//! collaborators every route uses

use crate::playwright::PlaywrightClient;
use crate::routes::create_router;
use crate::state::AppState;
use axum::Router;
use bridge_core::config::BridgeConfig;
use bridge_core::workspace::local_workspace;
use bridge_core::{BridgeError, BridgeResult, CapabilityModelProvider, ChatService, StreamRelay};
use bridge_tools::{TerminalLauncher, ToolContext, default_executor};
use parking_lot::RwLock;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

struct RunningServer {
    addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<std::io::Result<()>>,
}

/// Localhost HTTP gateway
pub struct Gateway {
    config: BridgeConfig,
    state: AppState,
    terminal_enabled: Arc<AtomicBool>,
    running: Option<RunningServer>,
}

impl Gateway {
    /// Wire up the chat pipeline, tools and routes for `config`
    pub fn new(
        config: BridgeConfig,
        provider: Arc<dyn CapabilityModelProvider>,
        terminal: Arc<dyn TerminalLauncher>,
    ) -> Self {
        let workspace = config.workspace.as_ref().map(local_workspace);
        let terminal_enabled = Arc::new(AtomicBool::new(config.tools.enable_terminal));

        let executor = default_executor(ToolContext {
            workspace: workspace.clone(),
            terminal,
            terminal_enabled: terminal_enabled.clone(),
        });
        let relay = StreamRelay::new(provider).with_remote_timeout(config.remote.timeout());
        let chat = ChatService::new(relay, Arc::new(executor));

        let state = AppState {
            chat: Arc::new(chat),
            workspace,
            origins: Arc::new(RwLock::new(config.origin_allow_list())),
            playwright: PlaywrightClient::from_config(&config.playwright),
        };

        Self {
            config,
            state,
            terminal_enabled,
            running: None,
        }
    }

    /// Current configuration snapshot
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Router serving every route against this gateway's state
    pub fn router(&self) -> Router {
        create_router(self.state.clone())
    }

    /// Address of the running listener
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running.as_ref().map(|r| r.addr)
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Bind `127.0.0.1:<server.port>` and start serving
    pub async fn start(&mut self) -> BridgeResult<SocketAddr> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, self.config.server.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| BridgeError::io(format!("Failed to bind {}: {}", addr, e)))?;
        self.start_with_listener(listener).await
    }

    /// Start serving on an already bound listener
    pub async fn start_with_listener(&mut self, listener: TcpListener) -> BridgeResult<SocketAddr> {
        if let Some(running) = &self.running {
            return Err(BridgeError::internal(format!(
                "Gateway is already listening on {}",
                running.addr
            )));
        }

        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let router = self.router();
        let signal = shutdown.clone().cancelled_owned();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(signal)
                .await
        });

        tracing::info!(%addr, workspace = ?self.state.workspace.as_ref().map(|w| w.root()), "gateway listening");
        self.running = Some(RunningServer {
            addr,
            shutdown,
            task,
        });
        Ok(addr)
    }

    /// Stop accepting connections and wait for in-flight requests to finish
    pub async fn stop(&mut self) -> BridgeResult<()> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };
        running.shutdown.cancel();
        match running.task.await {
            Ok(Ok(())) => {
                tracing::info!(addr = %running.addr, "gateway stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(BridgeError::io(format!("Gateway server failed: {}", e))),
            Err(e) => Err(BridgeError::internal(format!("Gateway task failed: {}", e))),
        }
    }

    /// Apply a reloaded configuration to the running gateway
    ///
    /// Origins and the terminal flag take effect immediately. Port, workspace
    /// and backend changes need a restart.
    pub fn apply_config(&mut self, config: BridgeConfig) {
        *self.state.origins.write() = config.origin_allow_list();
        self.terminal_enabled
            .store(config.tools.enable_terminal, Ordering::Relaxed);

        if config.server.port != self.config.server.port
            || config.workspace != self.config.workspace
            || config.capability != self.config.capability
            || config.remote != self.config.remote
            || config.playwright != self.config.playwright
        {
            tracing::warn!("some configuration changes take effect only after a restart");
        }
        tracing::info!(
            origins = self.state.origins.read().len(),
            enable_terminal = config.tools.enable_terminal,
            "configuration reloaded"
        );

        self.config.security = config.security;
        self.config.tools = config.tools;
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.shutdown.cancel();
        }
    }
}
