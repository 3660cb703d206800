//! Employee commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use irbana_client::ApiClient;
use irbana_client::resources::employees::{Employee, EmployeeFilter, EmployeeUpdate, NewEmployee};
use irbana_client::resources::EmployeesApi;
use irbana_core::error::AppError;

use super::PageArgs;
use crate::output::{self, OutputFormat};

/// Arguments for employee commands
#[derive(Debug, Args)]
pub struct EmployeesArgs {
    /// Employee subcommand
    #[command(subcommand)]
    pub command: EmployeesCommand,
}

/// Employee subcommands
#[derive(Debug, Subcommand)]
pub enum EmployeesCommand {
    /// List employees
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Search by name
        #[arg(long)]
        search: Option<String>,
        /// Filter by status
        #[arg(long)]
        status: Option<String>,
        /// Filter by job title
        #[arg(long)]
        cargo: Option<String>,
    },
    /// Show one employee
    Show {
        /// Employee ID
        id: String,
    },
    /// Create an employee
    Create {
        /// Full name
        #[arg(long)]
        nome: String,
        /// Job title
        #[arg(long)]
        cargo: String,
        /// CPF
        #[arg(long)]
        cpf: Option<String>,
        /// E-mail
        #[arg(long)]
        email: Option<String>,
        /// Phone number
        #[arg(long)]
        telefone: Option<String>,
        /// Monthly salary
        #[arg(long)]
        salario: Option<f64>,
        /// Hiring date (YYYY-MM-DD)
        #[arg(long)]
        data_admissao: Option<String>,
    },
    /// Update an employee
    Update {
        /// Employee ID
        id: String,
        /// Job title
        #[arg(long)]
        cargo: Option<String>,
        /// Status
        #[arg(long)]
        status: Option<String>,
        /// Monthly salary
        #[arg(long)]
        salario: Option<f64>,
        /// Phone number
        #[arg(long)]
        telefone: Option<String>,
    },
    /// Delete an employee
    Delete {
        /// Employee ID
        id: String,
        /// Skip confirmation
        #[arg(long)]
        yes: bool,
    },
}

/// Employee display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct EmployeeRow {
    /// Employee ID
    id: String,
    /// Name
    nome: String,
    /// Job title
    cargo: String,
    /// Status
    status: String,
    /// Salary
    salario: String,
}

impl From<&Employee> for EmployeeRow {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.clone(),
            nome: e.nome.clone(),
            cargo: output::cell(e.cargo.as_deref()),
            status: output::cell(e.status.as_deref()),
            salario: output::money(e.salario),
        }
    }
}

/// Execute employee commands
pub async fn execute(
    args: &EmployeesArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let api = EmployeesApi::new(client.clone());

    match &args.command {
        EmployeesCommand::List {
            page,
            search,
            status,
            cargo,
        } => {
            let filter = EmployeeFilter {
                page: (*page).into(),
                search: search.clone(),
                status: status.clone(),
                cargo: cargo.clone(),
            };
            let employees = api.list(&filter).await?;
            output::print_page::<_, EmployeeRow>(&employees, format);
        }
        EmployeesCommand::Show { id } => {
            output::print_item(&api.get(id).await?, format);
        }
        EmployeesCommand::Create {
            nome,
            cargo,
            cpf,
            email,
            telefone,
            salario,
            data_admissao,
        } => {
            let employee = NewEmployee {
                nome: nome.clone(),
                cargo: cargo.clone(),
                cpf: cpf.clone(),
                email: email.clone(),
                telefone: telefone.clone(),
                salario: *salario,
                data_admissao: data_admissao.clone(),
                ..Default::default()
            };
            let created = api.create(&employee).await?;
            output::print_success(&format!(
                "Employee '{}' created (id: {})",
                created.nome, created.id
            ));
        }
        EmployeesCommand::Update {
            id,
            cargo,
            status,
            salario,
            telefone,
        } => {
            let changes = EmployeeUpdate {
                cargo: cargo.clone(),
                status: status.clone(),
                salario: *salario,
                telefone: telefone.clone(),
                ..Default::default()
            };
            let updated = api.update(id, &changes).await?;
            output::print_success(&format!("Employee '{}' updated", updated.nome));
        }
        EmployeesCommand::Delete { id, yes } => {
            if !*yes && !super::confirm(&format!("Delete employee {}?", id))? {
                output::print_warning("Cancelled");
                return Ok(());
            }
            api.delete(id).await?;
            output::print_success(&format!("Employee {} deleted", id));
        }
    }

    Ok(())
}
