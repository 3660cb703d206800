//! Vacation request commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use irbana_client::ApiClient;
use irbana_client::resources::VacationsApi;
use irbana_client::resources::vacations::{NewVacation, Vacation, VacationFilter};
use irbana_core::error::AppError;

use crate::output::{self, OutputFormat};

/// Arguments for vacation commands
#[derive(Debug, Args)]
pub struct VacationsArgs {
    /// Vacation subcommand
    #[command(subcommand)]
    pub command: VacationsCommand,
}

/// Vacation subcommands
#[derive(Debug, Subcommand)]
pub enum VacationsCommand {
    /// List vacation requests
    List {
        /// Filter by employee
        #[arg(long)]
        funcionario_id: Option<i64>,
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
    },
    /// Request a vacation
    Request {
        /// Employee ID
        #[arg(long)]
        funcionario_id: i64,
        /// First day off (YYYY-MM-DD)
        #[arg(long)]
        inicio: String,
        /// Last day off (YYYY-MM-DD)
        #[arg(long)]
        fim: String,
        /// Number of days
        #[arg(long)]
        dias: u32,
        /// Notes
        #[arg(long)]
        observacoes: Option<String>,
    },
    /// Approve a request
    Approve {
        /// Request ID
        id: String,
        /// Approver's employee ID
        #[arg(long)]
        aprovado_por: i64,
    },
    /// Reject a request
    Reject {
        /// Request ID
        id: String,
        /// Reason for rejecting
        #[arg(long)]
        motivo: String,
    },
}

/// Vacation display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct VacationRow {
    /// Request ID
    id: String,
    /// Employee
    funcionario_id: i64,
    /// Start
    inicio: String,
    /// End
    fim: String,
    /// Days
    dias: u32,
    /// Status
    status: String,
}

impl From<&Vacation> for VacationRow {
    fn from(v: &Vacation) -> Self {
        Self {
            id: v.id.clone(),
            funcionario_id: v.funcionario_id,
            inicio: v.data_inicio.clone(),
            fim: v.data_fim.clone(),
            dias: v.dias_solicitados,
            status: output::cell(v.status.as_deref()),
        }
    }
}

/// Execute vacation commands
pub async fn execute(
    args: &VacationsArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let api = VacationsApi::new(client.clone());

    match &args.command {
        VacationsCommand::List {
            funcionario_id,
            status,
        } => {
            let filter = VacationFilter {
                funcionario_id: *funcionario_id,
                status: status.clone(),
            };
            let vacations = api.list(&filter).await?;
            output::print_page::<_, VacationRow>(&vacations, format);
        }
        VacationsCommand::Request {
            funcionario_id,
            inicio,
            fim,
            dias,
            observacoes,
        } => {
            let vacation = NewVacation {
                funcionario_id: *funcionario_id,
                data_inicio: inicio.clone(),
                data_fim: fim.clone(),
                dias_solicitados: *dias,
                observacoes: observacoes.clone(),
            };
            let created = api.create(&vacation).await?;
            output::print_success(&format!("Vacation request {} created", created.id));
        }
        VacationsCommand::Approve { id, aprovado_por } => {
            let approved = api.approve(id, *aprovado_por).await?;
            output::print_success(&format!(
                "Vacation request {} approved ({})",
                approved.id,
                output::cell(approved.status.as_deref())
            ));
        }
        VacationsCommand::Reject { id, motivo } => {
            api.reject(id, motivo).await?;
            output::print_success(&format!("Vacation request {} rejected", id));
        }
    }

    Ok(())
}
