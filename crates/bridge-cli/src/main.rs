//! Copilot Bridge CLI
//!
//! Runs the localhost gateway that the browser extension talks to.
//!
//! ```bash
//! bridge serve --port 3030 --workspace ~/project
//! bridge config init
//! ```

mod args;
mod commands;
mod logging;
mod signal_handler;

use args::{Cli, Commands, ConfigAction, ServeArgs};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_file = cli.config_file.as_deref();

    match cli.command {
        Some(Commands::Config {
            action: ConfigAction::Init { force },
        }) => commands::config::init(config_file, force),
        Some(Commands::Config {
            action: ConfigAction::Show,
        }) => {
            let config = commands::effective_config(config_file, &ServeArgs::default())?;
            commands::config::show(&config, config_file)
        }
        Some(Commands::Serve(flags)) => {
            let config = commands::effective_config(config_file, &flags)?;
            logging::init(&config.logging);
            commands::serve::serve(config, config_file, &flags).await
        }
        None => {
            let flags = ServeArgs::default();
            let config = commands::effective_config(config_file, &flags)?;
            if !config.server.auto_start {
                println!("server.auto_start is off; run `bridge serve` to start the gateway");
                return Ok(());
            }
            logging::init(&config.logging);
            commands::serve::serve(config, config_file, &flags).await
        }
    }
}
