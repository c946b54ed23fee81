//! Configuration management for Copilot Bridge
//!
//! Configuration is layered: defaults, then a TOML/JSON/YAML file, then
//! `BRIDGE_*` environment variables. The CLI applies its own flags last.

pub mod env_loader;
pub mod file_loader;
pub mod logging_config;
pub mod model;
pub mod origins;
pub mod timeouts;

pub use env_loader::apply_env_overrides;
pub use file_loader::{CONFIG_FILE_NAME, default_config_path, load_config, load_from_file};
pub use logging_config::{LogFormat, LoggingConfig};
pub use model::{
    BridgeConfig, CapabilityBackendConfig, CapabilityModelConfig, PlaywrightConfig, RemoteConfig,
    SecurityConfig, ServerConfig, ToolConfig,
};
pub use origins::{DEFAULT_EXTENSION_ORIGIN, OriginAllowList};
