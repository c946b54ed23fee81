//! `bridge serve`

use super::effective_config;
use crate::args::ServeArgs;
use crate::signal_handler::{SignalEvent, SignalHandler};
use bridge_core::config::BridgeConfig;
use bridge_core::{CapabilityModelProvider, HttpCapabilityProvider, UnavailableCapabilityProvider};
use bridge_server::Gateway;
use bridge_tools::ProcessTerminalLauncher;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

/// Run the gateway until SIGINT/SIGTERM, reloading on SIGHUP
pub async fn serve(config: BridgeConfig, config_file: Option<&Path>, flags: &ServeArgs) -> anyhow::Result<()> {
    let provider = capability_provider(&config);
    let terminal = Arc::new(ProcessTerminalLauncher::new(config.workspace.clone()));
    let mut gateway = Gateway::new(config, provider, terminal);
    let mut signals = SignalHandler::new()?;

    let addr = gateway.start().await?;
    print_banner(gateway.config(), &addr.to_string());

    loop {
        match signals.next().await {
            SignalEvent::Reload => match effective_config(config_file, flags) {
                Ok(config) => gateway.apply_config(config),
                Err(e) => tracing::error!(error = %e, "configuration reload failed; keeping current settings"),
            },
            SignalEvent::Shutdown => break,
        }
    }

    tracing::info!("shutting down");
    gateway.stop().await?;
    Ok(())
}

/// Capability backend from config, or one that offers no models
fn capability_provider(config: &BridgeConfig) -> Arc<dyn CapabilityModelProvider> {
    match &config.capability {
        Some(backend) => {
            tracing::info!(
                endpoint = %backend.endpoint,
                models = backend.models.len(),
                "using HTTP capability backend"
            );
            Arc::new(HttpCapabilityProvider::from_config(backend, config.remote.timeout()))
        }
        None => {
            tracing::info!("no capability backend configured; only remote endpoints are available");
            Arc::new(UnavailableCapabilityProvider)
        }
    }
}

fn print_banner(config: &BridgeConfig, addr: &str) {
    println!("{} {}", "Copilot Bridge".bold().cyan(), bridge_core::VERSION.dimmed());
    println!("  {} http://{}", "Listening:".bold(), addr);
    match &config.workspace {
        Some(workspace) => println!("  {} {}", "Workspace:".bold(), workspace.display()),
        None => println!("  {} {}", "Workspace:".bold(), "none (file routes disabled)".yellow()),
    }
    let terminal = if config.tools.enable_terminal {
        "enabled".green()
    } else {
        "disabled".dimmed()
    };
    println!("  {} {}", "Terminal tool:".bold(), terminal);
    println!("  {} {}", "Allowed origins:".bold(), config.origin_allow_list().len());
}
