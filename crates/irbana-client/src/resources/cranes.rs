//! Cranes (`/gruas`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use irbana_core::result::AppResult;
use irbana_core::types::PageQuery;
use irbana_core::types::money::deserialize_optional_amount;

use super::{Page, id_string};
use crate::client::ApiClient;
use crate::request::ApiRequest;

const PATH: &str = "/gruas";

/// A crane in the fleet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crane {
    /// Identifier.
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Display name.
    #[serde(default, alias = "name")]
    pub nome: Option<String>,
    /// Model.
    #[serde(default, alias = "model")]
    pub modelo: Option<String>,
    /// Manufacturer.
    #[serde(default)]
    pub fabricante: Option<String>,
    /// Load capacity, as printed on the plate.
    #[serde(default, alias = "capacity")]
    pub capacidade: Option<Value>,
    /// Status (`disponivel`, `em_obra`, `manutencao`, `inativa`).
    #[serde(default)]
    pub status: Option<String>,
    /// Monthly rental price.
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub valor_locacao: Option<f64>,
    /// Site the crane is currently allocated to.
    #[serde(default)]
    pub obra_atual_id: Option<Value>,
}

impl Crane {
    /// Name to show, falling back to the identifier.
    pub fn label(&self) -> &str {
        self.nome.as_deref().unwrap_or(&self.id)
    }
}

/// Filters for [`CranesApi::list`].
#[derive(Debug, Clone, Default)]
pub struct CraneFilter {
    /// Page selection.
    pub page: PageQuery,
    /// Status filter.
    pub status: Option<String>,
    /// Free-text search.
    pub search: Option<String>,
}

/// Crane endpoints.
#[derive(Debug, Clone)]
pub struct CranesApi {
    client: ApiClient,
}

impl CranesApi {
    /// Create the endpoint group.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List cranes.
    pub async fn list(&self, filter: &CraneFilter) -> AppResult<Page<Crane>> {
        let request = ApiRequest::get(PATH)
            .page(filter.page)
            .query_opt("status", filter.status.as_deref())
            .query_opt("search", filter.search.as_deref());
        super::list(&self.client, request).await
    }

    /// Fetch one crane.
    pub async fn get(&self, id: &str) -> AppResult<Crane> {
        super::get(&self.client, format!("{PATH}/{id}")).await
    }
}
