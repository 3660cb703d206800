//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use irbana_core::config::AppConfig;
use irbana_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Validate the configuration file
    Validate,
    /// Generate a default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config/generated.toml")]
        output: String,
    },
}

const DEFAULT_CONFIG: &str = include_str!("../../../../config/default.toml");

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            output::print_item(config, format);
        }
        ConfigCommand::Validate => match super::load_config(config_path) {
            Ok(config) => {
                output::print_success(&format!("Configuration '{}' is valid", config_path));
                output::print_kv("API", &config.api.api_root());
                output::print_kv("Timeout", &format!("{}s", config.api.timeout_seconds));
                output::print_kv("Store", &format!("{:?}", config.store.backend));
                output::print_kv("Read cache TTL", &format!("{}s", config.cache.read_ttl_seconds));
                output::print_kv(
                    "Storage URL",
                    config.upload.storage_public_url.as_deref().unwrap_or("(API origin)"),
                );
            }
            Err(e) => {
                output::print_error(&format!("Configuration invalid: {}", e));
                return Err(e);
            }
        },
        ConfigCommand::Generate { output: out_path } => {
            if let Some(parent) = std::path::Path::new(out_path).parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tokio::fs::write(out_path, DEFAULT_CONFIG).await?;
            output::print_success(&format!("Default config written to '{}'", out_path));
        }
    }

    Ok(())
}
