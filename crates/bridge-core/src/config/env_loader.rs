//! Environment variable overrides
//!
//! | Variable                 | Field                        |
//! |--------------------------|------------------------------|
//! | `BRIDGE_PORT`            | `server.port`                |
//! | `BRIDGE_AUTO_START`      | `server.auto_start`          |
//! | `BRIDGE_ALLOWED_ORIGINS` | `security.allowed_origins`   |
//! | `BRIDGE_ENABLE_TERMINAL` | `tools.enable_terminal`      |
//! | `BRIDGE_WORKSPACE`       | `workspace`                  |
//! | `BRIDGE_LOG_LEVEL`       | `logging.level`              |

use super::model::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use std::path::PathBuf;

/// Apply `BRIDGE_*` overrides read through `lookup`
///
/// `lookup` is normally `|name| std::env::var(name).ok()`.
pub fn apply_env_overrides<F>(mut config: BridgeConfig, lookup: F) -> BridgeResult<BridgeConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("BRIDGE_PORT") {
        config.server.port = port.trim().parse().map_err(|_| {
            BridgeError::config_with_context(
                "Invalid BRIDGE_PORT value",
                format!("Parsing port value '{}'", port),
            )
        })?;
    }

    if let Some(value) = lookup("BRIDGE_AUTO_START") {
        config.server.auto_start = parse_flag("BRIDGE_AUTO_START", &value)?;
    }

    if let Some(origins) = lookup("BRIDGE_ALLOWED_ORIGINS") {
        config.security.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }

    if let Some(value) = lookup("BRIDGE_ENABLE_TERMINAL") {
        config.tools.enable_terminal = parse_flag("BRIDGE_ENABLE_TERMINAL", &value)?;
    }

    if let Some(workspace) = lookup("BRIDGE_WORKSPACE") {
        let workspace = workspace.trim();
        config.workspace = if workspace.is_empty() {
            None
        } else {
            Some(PathBuf::from(workspace))
        };
    }

    if let Some(level) = lookup("BRIDGE_LOG_LEVEL") {
        config.logging.level = level;
    }

    Ok(config)
}

fn parse_flag(name: &str, value: &str) -> BridgeResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(BridgeError::config_with_context(
            format!("Invalid {} value", name),
            format!("Expected a boolean, got '{}'", other),
        )),
    }
}
