//! Crane commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use irbana_client::ApiClient;
use irbana_client::resources::CranesApi;
use irbana_client::resources::cranes::{Crane, CraneFilter};
use irbana_core::error::AppError;

use super::PageArgs;
use crate::output::{self, OutputFormat};

/// Arguments for crane commands
#[derive(Debug, Args)]
pub struct CranesArgs {
    /// Crane subcommand
    #[command(subcommand)]
    pub command: CranesCommand,
}

/// Crane subcommands
#[derive(Debug, Subcommand)]
pub enum CranesCommand {
    /// List cranes
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        /// Search by name or model
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one crane
    Show {
        /// Crane ID
        id: String,
    },
}

/// Crane display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct CraneRow {
    /// Crane ID
    id: String,
    /// Name
    nome: String,
    /// Model
    modelo: String,
    /// Capacity
    capacidade: String,
    /// Status
    status: String,
}

impl From<&Crane> for CraneRow {
    fn from(c: &Crane) -> Self {
        Self {
            id: c.id.clone(),
            nome: c.label().to_string(),
            modelo: output::cell(c.modelo.as_deref()),
            capacidade: c
                .capacidade
                .as_ref()
                .map(output::display_value)
                .unwrap_or_default(),
            status: output::cell(c.status.as_deref()),
        }
    }
}

/// Execute crane commands
pub async fn execute(
    args: &CranesArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let api = CranesApi::new(client.clone());

    match &args.command {
        CranesCommand::List {
            page,
            status,
            search,
        } => {
            let filter = CraneFilter {
                page: (*page).into(),
                status: status.clone(),
                search: search.clone(),
            };
            let cranes = api.list(&filter).await?;
            output::print_page::<_, CraneRow>(&cranes, format);
        }
        CranesCommand::Show { id } => {
            output::print_item(&api.get(id).await?, format);
        }
    }

    Ok(())
}
