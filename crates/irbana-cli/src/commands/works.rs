//! Construction site commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use irbana_client::ApiClient;
use irbana_client::resources::WorksApi;
use irbana_client::resources::works::{NewWork, Work, WorkFilter, WorkUpdate};
use irbana_core::error::AppError;

use super::PageArgs;
use crate::output::{self, OutputFormat};

/// Arguments for site commands
#[derive(Debug, Args)]
pub struct WorksArgs {
    /// Site subcommand
    #[command(subcommand)]
    pub command: WorksCommand,
}

/// Site subcommands
#[derive(Debug, Subcommand)]
pub enum WorksCommand {
    /// List sites
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        /// Filter by customer
        #[arg(long)]
        cliente_id: Option<i64>,
    },
    /// Show a site with its allocated cranes and employees
    Show {
        /// Site ID
        id: String,
    },
    /// Create a site
    Create {
        /// Site name
        #[arg(long)]
        nome: String,
        /// Customer ID
        #[arg(long)]
        cliente_id: i64,
        /// Street address
        #[arg(long)]
        endereco: String,
        /// City
        #[arg(long)]
        cidade: String,
        /// State (UF)
        #[arg(long)]
        estado: String,
        /// Site type
        #[arg(long)]
        tipo: String,
        /// Budget
        #[arg(long)]
        orcamento: Option<f64>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        data_inicio: Option<String>,
    },
    /// Update a site
    Update {
        /// Site ID
        id: String,
        /// Status
        #[arg(long)]
        status: Option<String>,
        /// Budget
        #[arg(long)]
        orcamento: Option<f64>,
        /// Expected end date (YYYY-MM-DD)
        #[arg(long)]
        data_fim: Option<String>,
    },
    /// Delete a site
    Delete {
        /// Site ID
        id: String,
        /// Skip confirmation
        #[arg(long)]
        yes: bool,
    },
}

/// Site display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct WorkRow {
    /// Site ID
    id: String,
    /// Name
    nome: String,
    /// Customer
    cliente: String,
    /// City
    cidade: String,
    /// Status
    status: String,
    /// Budget
    orcamento: String,
}

impl From<&Work> for WorkRow {
    fn from(w: &Work) -> Self {
        Self {
            id: w.id.clone(),
            nome: w.nome.clone(),
            cliente: w
                .clientes
                .as_ref()
                .and_then(|c| c.nome.clone())
                .unwrap_or_else(|| output::cell(w.cliente_id)),
            cidade: output::cell(w.cidade.as_deref()),
            status: output::cell(w.status.as_deref()),
            orcamento: output::money(w.orcamento),
        }
    }
}

/// Execute site commands
pub async fn execute(
    args: &WorksArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let api = WorksApi::new(client.clone());

    match &args.command {
        WorksCommand::List {
            page,
            status,
            cliente_id,
        } => {
            let filter = WorkFilter {
                page: (*page).into(),
                status: status.clone(),
                cliente_id: *cliente_id,
            };
            let works = api.list(&filter).await?;
            output::print_page::<_, WorkRow>(&works, format);
        }
        WorksCommand::Show { id } => {
            let details = api.details(id).await?;
            match format {
                OutputFormat::Json => output::print_item(&details, format),
                OutputFormat::Table => {
                    output::print_item(&details.work, format);
                    println!();
                    println!("Cranes: {}", details.cranes.len());
                    for crane in &details.cranes {
                        let name = crane
                            .grua
                            .as_ref()
                            .and_then(|g| g.get("name").or_else(|| g.get("nome")))
                            .map(output::display_value)
                            .or_else(|| crane.grua_id.as_ref().map(output::display_value))
                            .unwrap_or_default();
                        println!("  - {} ({})", name, output::cell(crane.status.as_deref()));
                    }
                    println!("Employees: {}", details.employees.len());
                    for employee in &details.employees {
                        let name = employee
                            .funcionario
                            .as_ref()
                            .and_then(|f| f.get("nome"))
                            .map(output::display_value)
                            .unwrap_or_else(|| output::cell(employee.funcionario_id));
                        println!("  - {} ({})", name, output::cell(employee.cargo.as_deref()));
                    }
                }
            }
        }
        WorksCommand::Create {
            nome,
            cliente_id,
            endereco,
            cidade,
            estado,
            tipo,
            orcamento,
            data_inicio,
        } => {
            let work = NewWork {
                nome: nome.clone(),
                cliente_id: Some(*cliente_id),
                endereco: endereco.clone(),
                cidade: cidade.clone(),
                estado: estado.clone(),
                tipo: tipo.clone(),
                orcamento: *orcamento,
                data_inicio: data_inicio.clone(),
                ..Default::default()
            };
            let created = api.create(&work).await?;
            output::print_success(&format!("Site '{}' created (id: {})", created.nome, created.id));
        }
        WorksCommand::Update {
            id,
            status,
            orcamento,
            data_fim,
        } => {
            let changes = WorkUpdate {
                status: status.clone(),
                orcamento: *orcamento,
                data_fim: data_fim.clone(),
                ..Default::default()
            };
            let updated = api.update(id, &changes).await?;
            output::print_success(&format!("Site '{}' updated", updated.nome));
        }
        WorksCommand::Delete { id, yes } => {
            if !*yes && !super::confirm(&format!("Delete site {}?", id))? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            api.delete(id).await?;
            output::print_success(&format!("Site {} deleted", id));
        }
    }

    Ok(())
}
