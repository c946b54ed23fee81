//! Configuration management commands

use bridge_core::config::{BridgeConfig, default_config_path};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Print the effective configuration as TOML
pub fn show(config: &BridgeConfig, config_file: Option<&Path>) -> anyhow::Result<()> {
    match resolve_path(config_file) {
        Some(path) if path.exists() => println!("{} {}", "# Loaded from".dimmed(), path.display()),
        Some(path) => println!(
            "{} {}",
            "# Not found, using defaults:".dimmed(),
            path.display()
        ),
        None => println!("{}", "# No config directory; using defaults".dimmed()),
    }
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Write a default configuration file
pub fn init(config_file: Option<&Path>, force: bool) -> anyhow::Result<()> {
    let path = resolve_path(config_file)
        .ok_or_else(|| anyhow::anyhow!("No config directory found; pass --config-file"))?;
    write_default(&path, force)?;
    println!("{} {}", "Created".green().bold(), path.display());
    Ok(())
}

fn resolve_path(config_file: Option<&Path>) -> Option<PathBuf> {
    config_file.map(Path::to_path_buf).or_else(default_config_path)
}

fn write_default(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists; use --force to overwrite",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(&BridgeConfig::default())?)?;
    Ok(())
}
