//! Customers (`/clientes`).

use serde::{Deserialize, Serialize};
use validator::Validate;

use irbana_core::result::AppResult;
use irbana_core::types::PageQuery;

use super::{Page, id_string};
use crate::client::ApiClient;
use crate::request::ApiRequest;

const PATH: &str = "/clientes";

/// A customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Identifier.
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Company name.
    pub nome: String,
    /// CNPJ document number.
    #[serde(default)]
    pub cnpj: Option<String>,
    /// E-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub telefone: Option<String>,
    /// Street address.
    #[serde(default)]
    pub endereco: Option<String>,
    /// City.
    #[serde(default)]
    pub cidade: Option<String>,
    /// State (UF).
    #[serde(default)]
    pub estado: Option<String>,
    /// Postal code.
    #[serde(default)]
    pub cep: Option<String>,
    /// Contact person.
    #[serde(default)]
    pub contato: Option<String>,
    /// Status.
    #[serde(default)]
    pub status: Option<String>,
}

/// Filters for [`CustomersApi::list`].
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    /// Page selection.
    pub page: PageQuery,
    /// Free-text search.
    pub search: Option<String>,
}

/// Payload for creating a customer.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct NewCustomer {
    /// Company name.
    #[validate(length(min = 1, message = "is required"))]
    pub nome: String,
    /// CNPJ document number.
    #[validate(length(min = 14, max = 18, message = "must be a valid CNPJ"))]
    pub cnpj: String,
    /// E-mail.
    #[validate(email(message = "must be a valid e-mail address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    /// Street address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endereco: Option<String>,
    /// City.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidade: Option<String>,
    /// State (UF).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    /// Postal code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    /// Contact person.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contato: Option<String>,
}

/// Customer endpoints.
#[derive(Debug, Clone)]
pub struct CustomersApi {
    client: ApiClient,
}

impl CustomersApi {
    /// Create the endpoint group.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List customers.
    pub async fn list(&self, filter: &CustomerFilter) -> AppResult<Page<Customer>> {
        let request = ApiRequest::get(PATH)
            .page(filter.page)
            .query_opt("search", filter.search.as_deref());
        super::list(&self.client, request).await
    }

    /// Fetch one customer.
    pub async fn get(&self, id: &str) -> AppResult<Customer> {
        super::get(&self.client, format!("{PATH}/{id}")).await
    }

    /// Create a customer.
    pub async fn create(&self, customer: &NewCustomer) -> AppResult<Customer> {
        super::send_validated(&self.client, ApiRequest::post(PATH), customer).await
    }
}
