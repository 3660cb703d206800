//! Invoices (`/notas-fiscais`).

use serde::{Deserialize, Serialize};

use irbana_core::result::AppResult;
use irbana_core::types::PageQuery;
use irbana_core::types::money::{deserialize_amount, deserialize_optional_amount};

use super::{Page, id_string};
use crate::client::ApiClient;
use crate::request::ApiRequest;

const PATH: &str = "/notas-fiscais";

/// Counterparty summary embedded in an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Counterparty {
    /// Name.
    #[serde(default)]
    pub nome: Option<String>,
    /// CNPJ document number.
    #[serde(default)]
    pub cnpj: Option<String>,
}

/// An invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Identifier.
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Invoice number.
    #[serde(default)]
    pub numero_nf: Option<String>,
    /// Series.
    #[serde(default)]
    pub serie: Option<String>,
    /// Issue date.
    #[serde(default)]
    pub data_emissao: Option<String>,
    /// Due date.
    #[serde(default)]
    pub data_vencimento: Option<String>,
    /// Total amount.
    #[serde(default, deserialize_with = "deserialize_amount")]
    pub valor_total: f64,
    /// Amount already paid.
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub valor_pago: Option<f64>,
    /// Direction (`entrada` or `saida`).
    #[serde(default)]
    pub tipo: Option<String>,
    /// Status (`pendente`, `paga`, `vencida`, `cancelada`).
    #[serde(default)]
    pub status: Option<String>,
    /// Customer, for outgoing invoices.
    #[serde(default)]
    pub cliente_id: Option<i64>,
    /// Supplier, for incoming invoices.
    #[serde(default)]
    pub fornecedor_id: Option<i64>,
    /// Attached document path.
    #[serde(default)]
    pub arquivo_nf: Option<String>,
    /// Notes.
    #[serde(default)]
    pub observacoes: Option<String>,
    /// Customer summary.
    #[serde(default)]
    pub clientes: Option<Counterparty>,
    /// Supplier summary.
    #[serde(default)]
    pub fornecedores: Option<Counterparty>,
}

impl Invoice {
    /// Name of the customer or supplier.
    pub fn counterparty(&self) -> Option<&str> {
        self.clientes
            .as_ref()
            .or(self.fornecedores.as_ref())
            .and_then(|c| c.nome.as_deref())
    }
}

/// Filters for [`InvoicesApi::list`].
#[derive(Debug, Clone, Default)]
pub struct InvoiceFilter {
    /// Page selection.
    pub page: PageQuery,
    /// Status filter.
    pub status: Option<String>,
    /// Direction filter.
    pub tipo: Option<String>,
}

/// Invoice endpoints.
#[derive(Debug, Clone)]
pub struct InvoicesApi {
    client: ApiClient,
}

impl InvoicesApi {
    /// Create the endpoint group.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List invoices.
    pub async fn list(&self, filter: &InvoiceFilter) -> AppResult<Page<Invoice>> {
        let request = ApiRequest::get(PATH)
            .page(filter.page)
            .query_opt("status", filter.status.as_deref())
            .query_opt("tipo", filter.tipo.as_deref());
        super::list(&self.client, request).await
    }

    /// Fetch one invoice.
    pub async fn get(&self, id: &str) -> AppResult<Invoice> {
        super::get(&self.client, format!("{PATH}/{id}")).await
    }
}
