//! IRBANA back-office client
//!
//! Entry point: parse the command line, load configuration, initialize
//! logging and run the selected command.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use irbana_cli::Cli;
use irbana_cli::commands::load_config;
use irbana_core::config::AppConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::debug!(config = %cli.config, api = %config.api.api_root(), "Configuration loaded");

    if let Err(e) = cli.execute(config).await {
        tracing::debug!(kind = ?e.kind, status = ?e.status, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
