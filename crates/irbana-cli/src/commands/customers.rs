//! Customer commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use irbana_client::ApiClient;
use irbana_client::resources::CustomersApi;
use irbana_client::resources::customers::{Customer, CustomerFilter, NewCustomer};
use irbana_core::error::AppError;

use super::PageArgs;
use crate::output::{self, OutputFormat};

/// Arguments for customer commands
#[derive(Debug, Args)]
pub struct CustomersArgs {
    /// Customer subcommand
    #[command(subcommand)]
    pub command: CustomersCommand,
}

/// Customer subcommands
#[derive(Debug, Subcommand)]
pub enum CustomersCommand {
    /// List customers
    List {
        #[command(flatten)]
        page: PageArgs,
        /// Search by name or CNPJ
        #[arg(long)]
        search: Option<String>,
    },
    /// Show one customer
    Show {
        /// Customer ID
        id: String,
    },
    /// Create a customer
    Create {
        /// Company name
        #[arg(long)]
        nome: String,
        /// CNPJ
        #[arg(long)]
        cnpj: String,
        /// E-mail
        #[arg(long)]
        email: Option<String>,
        /// Phone number
        #[arg(long)]
        telefone: Option<String>,
        /// City
        #[arg(long)]
        cidade: Option<String>,
        /// State (UF)
        #[arg(long)]
        estado: Option<String>,
        /// Contact person
        #[arg(long)]
        contato: Option<String>,
    },
}

/// Customer display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct CustomerRow {
    /// Customer ID
    id: String,
    /// Name
    nome: String,
    /// CNPJ
    cnpj: String,
    /// City
    cidade: String,
    /// Contact
    contato: String,
}

impl From<&Customer> for CustomerRow {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id.clone(),
            nome: c.nome.clone(),
            cnpj: output::cell(c.cnpj.as_deref()),
            cidade: output::cell(c.cidade.as_deref()),
            contato: output::cell(c.contato.as_deref()),
        }
    }
}

/// Execute customer commands
pub async fn execute(
    args: &CustomersArgs,
    client: &ApiClient,
    format: OutputFormat,
) -> Result<(), AppError> {
    let api = CustomersApi::new(client.clone());

    match &args.command {
        CustomersCommand::List { page, search } => {
            let filter = CustomerFilter {
                page: (*page).into(),
                search: search.clone(),
            };
            let customers = api.list(&filter).await?;
            output::print_page::<_, CustomerRow>(&customers, format);
        }
        CustomersCommand::Show { id } => {
            output::print_item(&api.get(id).await?, format);
        }
        CustomersCommand::Create {
            nome,
            cnpj,
            email,
            telefone,
            cidade,
            estado,
            contato,
        } => {
            let customer = NewCustomer {
                nome: nome.clone(),
                cnpj: cnpj.clone(),
                email: email.clone(),
                telefone: telefone.clone(),
                cidade: cidade.clone(),
                estado: estado.clone(),
                contato: contato.clone(),
                ..Default::default()
            };
            let created = api.create(&customer).await?;
            output::print_success(&format!(
                "Customer '{}' created (id: {})",
                created.nome, created.id
            ));
        }
    }

    Ok(())
}
