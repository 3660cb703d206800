//! Typed clients for the back-office resources.
//!
//! Every client follows the same shape: build the query or body from typed
//! parameters, send it through [`ApiClient`], normalize the envelope and
//! decode the payload.

pub mod cranes;
pub mod customers;
pub mod employees;
pub mod invoices;
pub mod time_tracking;
pub mod vacations;
pub mod works;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::Validate;

use irbana_core::result::AppResult;
use irbana_core::types::Pagination;

use crate::client::ApiClient;
use crate::request::ApiRequest;

pub use cranes::CranesApi;
pub use customers::CustomersApi;
pub use employees::EmployeesApi;
pub use invoices::InvoicesApi;
pub use time_tracking::TimeTrackingApi;
pub use vacations::VacationsApi;
pub use works::WorksApi;

/// One page of a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// Records on this page.
    pub items: Vec<T>,
    /// Pagination block, when the endpoint sent one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    /// Total number of records, falling back to the page length.
    pub fn total(&self) -> u64 {
        self.pagination
            .map(|p| p.total)
            .filter(|t| *t > 0)
            .unwrap_or(self.items.len() as u64)
    }
}

/// Fetch a list endpoint.
pub(crate) async fn list<T: DeserializeOwned>(
    client: &ApiClient,
    request: ApiRequest,
) -> AppResult<Page<T>> {
    let envelope = client.fetch::<Vec<T>>(&request.cached()).await?;
    Ok(Page {
        items: envelope.data,
        pagination: envelope.pagination,
    })
}

/// Fetch a single record.
pub(crate) async fn get<T: DeserializeOwned>(client: &ApiClient, path: String) -> AppResult<T> {
    client.fetch_data(&ApiRequest::get(path).cached()).await
}

/// Validate `payload`, then send it as the JSON body of `request`.
pub(crate) async fn send_validated<P, T>(
    client: &ApiClient,
    request: ApiRequest,
    payload: &P,
) -> AppResult<T>
where
    P: Serialize + Validate,
    T: DeserializeOwned,
{
    payload.validate()?;
    client.fetch_data(&request.json(payload)?).await
}

/// Send a request whose payload is ignored.
pub(crate) async fn send_unit(client: &ApiClient, request: ApiRequest) -> AppResult<()> {
    client.envelope(&request).await.map(|_| ())
}

/// Accept identifiers sent either as numbers or as strings.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected an identifier, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "id_string")]
        id: String,
    }

    #[test]
    fn test_id_accepts_numbers_and_strings() {
        let a: Row = serde_json::from_value(json!({"id": 42})).unwrap();
        let b: Row = serde_json::from_value(json!({"id": "GR-01"})).unwrap();
        assert_eq!(a.id, "42");
        assert_eq!(b.id, "GR-01");
        assert!(serde_json::from_value::<Row>(json!({"id": [1]})).is_err());
    }

    #[test]
    fn test_page_total_falls_back_to_length() {
        let page = Page {
            items: vec![1, 2, 3],
            pagination: None,
        };
        assert_eq!(page.total(), 3);
    }
}
