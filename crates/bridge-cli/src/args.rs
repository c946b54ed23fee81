//! CLI argument definitions using clap
//!
//! - bridge                     # Serve, if `server.auto_start` is set
//! - bridge serve [--port N]    # Serve on 127.0.0.1
//! - bridge config show|init    # Inspect or create the config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "bridge")]
#[command(about = "Copilot Bridge - localhost gateway between a browser extension and chat backends")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file (TOML, JSON or YAML)
    #[arg(long, global = true, env = "BRIDGE_CONFIG")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the gateway
    Serve(ServeArgs),

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Flags that override the loaded configuration
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Workspace folder file tools and routes are confined to
    #[arg(long, short)]
    pub workspace: Option<PathBuf>,

    /// Allow the agent to launch terminal commands
    #[arg(long)]
    pub enable_terminal: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
