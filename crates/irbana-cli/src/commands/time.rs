//! Time clock commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use irbana_client::ApiClient;
use irbana_client::resources::TimeTrackingApi;
use irbana_client::resources::time_tracking::{NewTimeRecord, TimeRecord, TimeRecordFilter};
use irbana_core::error::AppError;

use super::PageArgs;
use crate::output::{self, OutputFormat};

/// Arguments for time clock commands
#[derive(Debug, Args)]
pub struct TimeArgs {
    /// Time clock subcommand
    #[command(subcommand)]
    pub command: TimeCommand,
}

/// Time clock subcommands
#[derive(Debug, Subcommand)]
pub enum TimeCommand {
    /// List records
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Filter by employee
        #[arg(long)]
        funcionario_id: Option<i64>,
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        de: Option<String>,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        ate: Option<String>,
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
    },
    /// Register a day
    Register {
        /// Employee ID
        #[arg(long)]
        funcionario_id: i64,
        /// Day (YYYY-MM-DD)
        #[arg(long)]
        data: String,
        /// Clock-in (HH:MM)
        #[arg(long)]
        entrada: Option<String>,
        /// Lunch break start (HH:MM)
        #[arg(long)]
        saida_almoco: Option<String>,
        /// Lunch break end (HH:MM)
        #[arg(long)]
        volta_almoco: Option<String>,
        /// Clock-out (HH:MM)
        #[arg(long)]
        saida: Option<String>,
    },
    /// Approve a record
    Approve {
        /// Record ID
        id: String,
        /// Approval note
        #[arg(long)]
        observacoes: Option<String>,
    },
    /// Reject a record
    Reject {
        /// Record ID
        id: String,
        /// Reason for rejecting
        #[arg(long)]
        motivo: String,
    },
}

/// Time record display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct TimeRow {
    /// Record ID
    id: String,
    /// Employee
    funcionario_id: i64,
    /// Day
    data: String,
    /// In
    entrada: String,
    /// Out
    saida: String,
    /// Hours
    horas: String,
    /// Overtime
    extras: String,
    /// Status
    status: String,
}

impl From<&TimeRecord> for TimeRow {
    fn from(r: &TimeRecord) -> Self {
        Self {
            id: r.id.clone(),
            funcionario_id: r.funcionario_id,
            data: r.data.clone(),
            entrada: output::cell(r.entrada.as_deref()),
            saida: output::cell(r.saida.as_deref()),
            horas: output::money(r.horas_trabalhadas),
            extras: output::money(r.horas_extras),
            status: output::cell(r.status.as_deref()),
        }
    }
}

/// Execute time clock commands
pub async fn execute(
    args: &TimeArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let api = TimeTrackingApi::new(client.clone());

    match &args.command {
        TimeCommand::List {
            page,
            funcionario_id,
            de,
            ate,
            status,
        } => {
            let filter = TimeRecordFilter {
                page: (*page).into(),
                funcionario_id: *funcionario_id,
                data_inicio: de.clone(),
                data_fim: ate.clone(),
                status: status.clone(),
            };
            let records = api.list(&filter).await?;
            output::print_page::<_, TimeRow>(&records, format);
        }
        TimeCommand::Register {
            funcionario_id,
            data,
            entrada,
            saida_almoco,
            volta_almoco,
            saida,
        } => {
            let record = NewTimeRecord {
                funcionario_id: *funcionario_id,
                data: data.clone(),
                entrada: entrada.clone(),
                saida_almoco: saida_almoco.clone(),
                volta_almoco: volta_almoco.clone(),
                saida: saida.clone(),
                observacoes: None,
            };
            let created = api.create(&record).await?;
            output::print_success(&format!("Time record {} created", created.id));
        }
        TimeCommand::Approve { id, observacoes } => {
            api.approve(id, observacoes.as_deref()).await?;
            output::print_success(&format!("Time record {} approved", id));
        }
        TimeCommand::Reject { id, motivo } => {
            api.reject(id, motivo).await?;
            output::print_success(&format!("Time record {} rejected", id));
        }
    }

    Ok(())
}
