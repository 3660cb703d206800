//! Invoice commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use irbana_client::ApiClient;
use irbana_client::resources::InvoicesApi;
use irbana_client::resources::invoices::{Invoice, InvoiceFilter};
use irbana_core::error::AppError;

use super::PageArgs;
use crate::output::{self, OutputFormat};

/// Arguments for invoice commands
#[derive(Debug, Args)]
pub struct InvoicesArgs {
    /// Invoice subcommand
    #[command(subcommand)]
    pub command: InvoicesCommand,
}

/// Invoice subcommands
#[derive(Debug, Subcommand)]
pub enum InvoicesCommand {
    /// List invoices
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Filter by status (pendente, paga, vencida, cancelada)
        #[arg(long)]
        status: Option<String>,
        /// Filter by direction (entrada, saida)
        #[arg(long)]
        tipo: Option<String>,
    },
    /// Show one invoice
    Show {
        /// Invoice ID
        id: String,
    },
}

/// Invoice display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct InvoiceRow {
    /// Invoice ID
    id: String,
    /// Number
    numero: String,
    /// Counterparty
    contraparte: String,
    /// Due date
    vencimento: String,
    /// Total
    valor_total: String,
    /// Status
    status: String,
}

impl From<&Invoice> for InvoiceRow {
    fn from(i: &Invoice) -> Self {
        Self {
            id: i.id.clone(),
            numero: output::cell(i.numero_nf.as_deref()),
            contraparte: output::cell(i.counterparty()),
            vencimento: output::cell(i.data_vencimento.as_deref()),
            valor_total: output::money(Some(i.valor_total)),
            status: output::cell(i.status.as_deref()),
        }
    }
}

/// Execute invoice commands
pub async fn execute(
    args: &InvoicesArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let api = InvoicesApi::new(client.clone());

    match &args.command {
        InvoicesCommand::List { page, status, tipo } => {
            let filter = InvoiceFilter {
                page: (*page).into(),
                status: status.clone(),
                tipo: tipo.clone(),
            };
            let invoices = api.list(&filter).await?;
            output::print_page::<_, InvoiceRow>(&invoices, format);
        }
        InvoicesCommand::Show { id } => {
            output::print_item(&api.get(id).await?, format);
        }
    }

    Ok(())
}
