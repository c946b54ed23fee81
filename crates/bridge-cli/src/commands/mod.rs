//! CLI command implementations

pub mod config;
pub mod serve;

use crate::args::ServeArgs;
use bridge_core::BridgeConfig;
use bridge_core::config::load_config;
use std::path::Path;

/// Load file and environment configuration, then apply command-line flags
pub fn effective_config(config_file: Option<&Path>, flags: &ServeArgs) -> anyhow::Result<BridgeConfig> {
    let config = load_config(config_file)?;
    let config = apply_flags(config, flags);
    config.validate()?;
    Ok(config)
}

fn apply_flags(mut config: BridgeConfig, flags: &ServeArgs) -> BridgeConfig {
    if let Some(port) = flags.port {
        config.server.port = port;
    }
    if let Some(workspace) = &flags.workspace {
        config.workspace = Some(
            std::path::absolute(workspace).unwrap_or_else(|_| workspace.clone()),
        );
    }
    if flags.enable_terminal {
        config.tools.enable_terminal = true;
    }
    config
}
