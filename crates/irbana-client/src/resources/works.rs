//! Construction sites (`/obras`) and their linked cranes and employees.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use irbana_core::result::AppResult;
use irbana_core::types::PageQuery;
use irbana_core::types::money::deserialize_optional_amount;

use super::{Page, id_string};
use crate::client::ApiClient;
use crate::request::ApiRequest;

const PATH: &str = "/obras";

/// Customer summary embedded in a site record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkCustomer {
    /// Customer name.
    #[serde(default)]
    pub nome: Option<String>,
    /// CNPJ document number.
    #[serde(default)]
    pub cnpj: Option<String>,
}

/// A construction site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Work {
    /// Identifier.
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Site name.
    pub nome: String,
    /// Owning customer.
    #[serde(default)]
    pub cliente_id: Option<i64>,
    /// Street address.
    #[serde(default)]
    pub endereco: Option<String>,
    /// City.
    #[serde(default)]
    pub cidade: Option<String>,
    /// State (UF).
    #[serde(default)]
    pub estado: Option<String>,
    /// Site type (`Residencial`, `Comercial`, ...).
    #[serde(default)]
    pub tipo: Option<String>,
    /// Status.
    #[serde(default)]
    pub status: Option<String>,
    /// Budget.
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub orcamento: Option<f64>,
    /// Start date.
    #[serde(default)]
    pub data_inicio: Option<String>,
    /// Expected end date.
    #[serde(default)]
    pub data_fim: Option<String>,
    /// Responsible employee.
    #[serde(default)]
    pub responsavel_id: Option<i64>,
    /// Customer summary, when joined by the backend.
    #[serde(default)]
    pub clientes: Option<WorkCustomer>,
}

/// A crane allocated to a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkCrane {
    /// Allocation identifier.
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    /// Crane identifier.
    #[serde(default)]
    pub grua_id: Option<Value>,
    /// Allocation start.
    #[serde(default)]
    pub data_inicio_locacao: Option<String>,
    /// Allocation end.
    #[serde(default)]
    pub data_fim_locacao: Option<String>,
    /// Monthly rental fee.
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub valor_locacao_mensal: Option<f64>,
    /// Allocation status.
    #[serde(default)]
    pub status: Option<String>,
    /// Crane details, when joined by the backend.
    #[serde(default)]
    pub grua: Option<Value>,
}

/// An employee allocated to a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkEmployee {
    /// Allocation identifier.
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    /// Employee identifier.
    #[serde(default)]
    pub funcionario_id: Option<i64>,
    /// Role on the site.
    #[serde(default)]
    pub cargo: Option<String>,
    /// Allocation start.
    #[serde(default)]
    pub data_inicio: Option<String>,
    /// Allocation end.
    #[serde(default)]
    pub data_fim: Option<String>,
    /// Allocation status.
    #[serde(default)]
    pub status: Option<String>,
    /// Employee details, when joined by the backend.
    #[serde(default)]
    pub funcionario: Option<Value>,
}

/// A site together with its allocations.
#[derive(Debug, Clone, Serialize)]
pub struct WorkDetails {
    /// The site.
    pub work: Work,
    /// Allocated cranes.
    pub cranes: Vec<WorkCrane>,
    /// Allocated employees.
    pub employees: Vec<WorkEmployee>,
}

/// Filters for [`WorksApi::list`].
#[derive(Debug, Clone, Default)]
pub struct WorkFilter {
    /// Page selection.
    pub page: PageQuery,
    /// Status filter.
    pub status: Option<String>,
    /// Customer filter.
    pub cliente_id: Option<i64>,
}

/// Payload for creating a site.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct NewWork {
    /// Site name.
    #[validate(length(min = 1, message = "is required"))]
    pub nome: String,
    /// Owning customer.
    #[validate(required(message = "is required"))]
    pub cliente_id: Option<i64>,
    /// Street address.
    #[validate(length(min = 1, message = "is required"))]
    pub endereco: String,
    /// City.
    #[validate(length(min = 1, message = "is required"))]
    pub cidade: String,
    /// State (UF).
    #[validate(length(equal = 2, message = "must be a two-letter state code"))]
    pub estado: String,
    /// Site type.
    #[validate(length(min = 1, message = "is required"))]
    pub tipo: String,
    /// Status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Budget.
    #[validate(range(min = 0.0, message = "must not be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcamento: Option<f64>,
    /// Start date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_inicio: Option<String>,
    /// Expected end date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_fim: Option<String>,
    /// Responsible employee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsavel_id: Option<i64>,
}

/// Partial update of a site.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct WorkUpdate {
    /// Site name.
    #[validate(length(min = 1, message = "must not be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    /// Status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Budget.
    #[validate(range(min = 0.0, message = "must not be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orcamento: Option<f64>,
    /// Expected end date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_fim: Option<String>,
    /// Responsible employee.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsavel_id: Option<i64>,
}

/// Construction site endpoints.
#[derive(Debug, Clone)]
pub struct WorksApi {
    client: ApiClient,
}

impl WorksApi {
    /// Create the endpoint group.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List sites.
    pub async fn list(&self, filter: &WorkFilter) -> AppResult<Page<Work>> {
        let request = ApiRequest::get(PATH)
            .page(filter.page)
            .query_opt("status", filter.status.as_deref())
            .query_opt("cliente_id", filter.cliente_id);
        super::list(&self.client, request).await
    }

    /// Fetch one site.
    pub async fn get(&self, id: &str) -> AppResult<Work> {
        super::get(&self.client, format!("{PATH}/{id}")).await
    }

    /// Create a site.
    pub async fn create(&self, work: &NewWork) -> AppResult<Work> {
        super::send_validated(&self.client, ApiRequest::post(PATH), work).await
    }

    /// Update a site.
    pub async fn update(&self, id: &str, changes: &WorkUpdate) -> AppResult<Work> {
        super::send_validated(&self.client, ApiRequest::put(format!("{PATH}/{id}")), changes).await
    }

    /// Delete a site.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        super::send_unit(&self.client, ApiRequest::delete(format!("{PATH}/{id}"))).await
    }

    /// Cranes allocated to a site.
    pub async fn cranes(&self, id: &str) -> AppResult<Vec<WorkCrane>> {
        super::get(&self.client, format!("{PATH}/{id}/gruas")).await
    }

    /// Employees allocated to a site.
    pub async fn employees(&self, id: &str) -> AppResult<Vec<WorkEmployee>> {
        super::get(&self.client, format!("{PATH}/{id}/funcionarios")).await
    }

    /// Fetch a site and both allocation lists concurrently.
    pub async fn details(&self, id: &str) -> AppResult<WorkDetails> {
        let (work, cranes, employees) =
            futures::try_join!(self.get(id), self.cranes(id), self.employees(id))?;
        Ok(WorkDetails {
            work,
            cranes,
            employees,
        })
    }
}
