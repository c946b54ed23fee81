//! Configuration data structures

use super::logging_config::LoggingConfig;
use super::origins::OriginAllowList;
use super::timeouts;
use crate::error::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Effective bridge configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub tools: ToolConfig,
    pub remote: RemoteConfig,
    pub playwright: PlaywrightConfig,
    /// Optional OpenAI-compatible backend exposed as capability models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capability: Option<CapabilityBackendConfig>,
    /// The only directory file tools and routes may touch
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<PathBuf>,
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Origins allowed to call protected routes
    pub fn origin_allow_list(&self) -> OriginAllowList {
        OriginAllowList::from_configured(&self.security.allowed_origins)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> BridgeResult<()> {
        if self.server.port == 0 {
            return Err(BridgeError::config("server.port must be between 1 and 65535"));
        }
        if self.remote.timeout_secs == 0 {
            return Err(BridgeError::config("remote.timeout_secs must be greater than 0"));
        }
        if self.playwright.port == 0 {
            return Err(BridgeError::config("playwright.port must be between 1 and 65535"));
        }
        if let Some(workspace) = &self.workspace {
            if !workspace.is_absolute() {
                return Err(BridgeError::config_with_context(
                    "workspace must be an absolute path",
                    workspace.display().to_string(),
                ));
            }
        }
        if let Some(capability) = &self.capability {
            if capability.endpoint.trim().is_empty() {
                return Err(BridgeError::config("capability.endpoint must not be empty"));
            }
            if capability.models.iter().any(|m| m.id.trim().is_empty()) {
                return Err(BridgeError::config("capability.models[].id must not be empty"));
            }
        }
        Ok(())
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Loopback port to listen on
    pub port: u16,
    /// Start serving when the CLI runs without a subcommand
    pub auto_start: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3030,
            auto_start: true,
        }
    }
}

/// Caller authentication settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Extension origins allowed in addition to the built-in one
    pub allowed_origins: Vec<String>,
}

/// Tool settings
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Allow the agent to launch terminal commands
    pub enable_terminal: bool,
}

/// Remote OpenAI-compatible backend settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout_secs: timeouts::remote::STREAM_SECS,
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Local browser automation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaywrightConfig {
    pub port: u16,
    pub timeout_secs: u64,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            port: 8931,
            timeout_secs: timeouts::automation::CALL_SECS,
        }
    }
}

impl PlaywrightConfig {
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// OpenAI-compatible endpoint presented through the capability interface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityBackendConfig {
    /// Base URL, e.g. `http://localhost:11434`
    pub endpoint: String,
    /// Environment variable holding the API key, if the endpoint needs one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Models offered to callers
    #[serde(default)]
    pub models: Vec<CapabilityModelConfig>,
}

impl CapabilityBackendConfig {
    /// Resolve the API key from the environment
    pub fn api_key(&self) -> Option<String> {
        self.api_key_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|key| !key.is_empty())
    }
}

/// One model offered by the capability backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityModelConfig {
    pub id: String,
    /// Family used for selection; defaults to the id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    /// Display name; defaults to the id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.server.port, 3030);
        assert!(config.server.auto_start);
        assert!(!config.tools.enable_terminal);
        assert_eq!(config.remote.timeout(), Duration::from_secs(30));
        assert_eq!(config.playwright.base_url(), "http://127.0.0.1:8931");
        assert!(config.workspace.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_relative_workspace_is_rejected() {
        let config = BridgeConfig {
            workspace: Some(PathBuf::from("relative/dir")),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut config = BridgeConfig::default();
        config.remote.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_allow_list_includes_configured_origins() {
        let mut config = BridgeConfig::default();
        config
            .security
            .allowed_origins
            .push("chrome-extension://abcdefghijklmnopabcdefghijklmnop".to_string());
        assert_eq!(config.origin_allow_list().len(), 2);
    }
}
