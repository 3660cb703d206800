//! CLI command definitions and dispatch.

pub mod auth;
pub mod config;
pub mod cranes;
pub mod customers;
pub mod employees;
pub mod invoices;
pub mod time;
pub mod upload;
pub mod vacations;
pub mod works;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use irbana_client::ApiClient;
use irbana_core::config::AppConfig;
use irbana_core::error::AppError;
use irbana_core::types::PageQuery;

use crate::navigator::CliNavigator;
use crate::output::OutputFormat;

/// IRBANA back-office client for the crane rental platform
#[derive(Debug, Parser)]
#[command(name = "irbana", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and store the session
    Login(auth::LoginArgs),
    /// End the session
    Logout,
    /// Show the signed-in user's profile
    Whoami(auth::WhoamiArgs),
    /// Employees
    Employees(employees::EmployeesArgs),
    /// Construction sites
    Works(works::WorksArgs),
    /// Cranes
    Cranes(cranes::CranesArgs),
    /// Customers
    Customers(customers::CustomersArgs),
    /// Invoices
    Invoices(invoices::InvoicesArgs),
    /// Vacation requests
    Vacations(vacations::VacationsArgs),
    /// Time clock records
    Time(time::TimeArgs),
    /// Upload a file to a construction site
    Upload(upload::UploadArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let format = self.format;
        match &self.command {
            Commands::Config(args) => config::execute(args, &self.config, &config, format).await,
            Commands::Login(args) => auth::login(args, &connect(config).await?).await,
            Commands::Logout => auth::logout(&connect(config).await?).await,
            Commands::Whoami(args) => auth::whoami(args, &connect(config).await?, format).await,
            Commands::Employees(args) => {
                employees::execute(args, &connect(config).await?, format).await
            }
            Commands::Works(args) => works::execute(args, &connect(config).await?, format).await,
            Commands::Cranes(args) => cranes::execute(args, &connect(config).await?, format).await,
            Commands::Customers(args) => {
                customers::execute(args, &connect(config).await?, format).await
            }
            Commands::Invoices(args) => {
                invoices::execute(args, &connect(config).await?, format).await
            }
            Commands::Vacations(args) => {
                vacations::execute(args, &connect(config).await?, format).await
            }
            Commands::Time(args) => time::execute(args, &connect(config).await?, format).await,
            Commands::Upload(args) => upload::execute(args, &connect(config).await?, format).await,
        }
    }
}

/// Page selection shared by list subcommands
#[derive(Debug, Clone, Copy, Args)]
pub struct PageArgs {
    /// Page number
    #[arg(long, default_value_t = 1)]
    pub page: u64,
    /// Items per page
    #[arg(long, default_value_t = 20)]
    pub limit: u64,
}

impl From<PageArgs> for PageQuery {
    fn from(args: PageArgs) -> Self {
        PageQuery::new(args.page, args.limit)
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: ask a yes/no question, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool, AppError> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}

/// Helper: build the API client with the terminal navigator
pub async fn connect(config: AppConfig) -> Result<ApiClient, AppError> {
    ApiClient::from_config(config, Arc::new(CliNavigator)).await
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_employee_list() {
        let cli = Cli::try_parse_from([
            "irbana", "--format", "json", "employees", "list", "--search", "ana", "--page", "2",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Commands::Employees(args) => match args.command {
                employees::EmployeesCommand::List { page, search, .. } => {
                    assert_eq!(page.page, 2);
                    assert_eq!(page.limit, 20);
                    assert_eq!(search.as_deref(), Some("ana"));
                }
                other => panic!("unexpected command: {other:?}"),
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_page_args_are_clamped() {
        let query: PageQuery = PageArgs { page: 0, limit: 500 }.into();
        assert_eq!(query, PageQuery::new(1, 100));
    }
}
