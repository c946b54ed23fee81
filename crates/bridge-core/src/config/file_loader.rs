//! File-based configuration loading

use super::env_loader::apply_env_overrides;
use super::model::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file name inside the per-user config directory
pub const CONFIG_FILE_NAME: &str = "bridge.toml";

/// `~/.config/copilot-bridge/bridge.toml` or the platform equivalent
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("copilot-bridge").join(CONFIG_FILE_NAME))
}

/// Load configuration from a file
///
/// Supports JSON, TOML, and YAML formats based on file extension.
/// Returns default config if file doesn't exist.
pub fn load_from_file(path: &Path) -> BridgeResult<BridgeConfig> {
    if !path.exists() {
        return Ok(BridgeConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        BridgeError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    parse_config(path, &content)
}

fn parse_config(path: &Path, content: &str) -> BridgeResult<BridgeConfig> {
    let context = |format: &str| format!("Deserializing {} configuration from '{}'", format, path.display());

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(content).map_err(|e| {
            BridgeError::config_with_context(format!("Failed to parse YAML config: {}", e), context("YAML"))
        })?,
        Some("json") => serde_json::from_str(content).map_err(|e| {
            BridgeError::config_with_context(format!("Failed to parse JSON config: {}", e), context("JSON"))
        })?,
        _ => toml::from_str(content).map_err(|e| {
            BridgeError::config_with_context(format!("Failed to parse TOML config: {}", e), context("TOML"))
        })?,
    };

    Ok(config)
}

/// Load the effective configuration
///
/// Reads `path` (or the default location), applies `BRIDGE_*` environment
/// overrides and validates the result.
pub fn load_config(path: Option<&Path>) -> BridgeResult<BridgeConfig> {
    let config = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            load_from_file(&path)?
        }
        None => BridgeConfig::default(),
    };

    let config = apply_env_overrides(config, |name| std::env::var(name).ok())?;
    config.validate()?;
    Ok(config)
}
