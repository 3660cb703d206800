//! Employees (`/funcionarios`).

use serde::{Deserialize, Serialize};
use validator::Validate;

use irbana_core::result::AppResult;
use irbana_core::types::PageQuery;
use irbana_core::types::money::deserialize_optional_amount;

use super::{Page, id_string};
use crate::client::ApiClient;
use crate::request::ApiRequest;

const PATH: &str = "/funcionarios";

/// An employee record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Identifier.
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Full name.
    pub nome: String,
    /// Job title.
    #[serde(default)]
    pub cargo: Option<String>,
    /// CPF document number.
    #[serde(default)]
    pub cpf: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub telefone: Option<String>,
    /// E-mail.
    #[serde(default)]
    pub email: Option<String>,
    /// Monthly salary.
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub salario: Option<f64>,
    /// Hiring date (`YYYY-MM-DD`).
    #[serde(default)]
    pub data_admissao: Option<String>,
    /// Status (`Ativo`, `Inativo`, `Férias`).
    #[serde(default)]
    pub status: Option<String>,
    /// Shift.
    #[serde(default)]
    pub turno: Option<String>,
}

/// Filters for [`EmployeesApi::list`].
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    /// Page selection.
    pub page: PageQuery,
    /// Free-text search.
    pub search: Option<String>,
    /// Status filter.
    pub status: Option<String>,
    /// Job title filter.
    pub cargo: Option<String>,
}

/// Payload for creating an employee.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct NewEmployee {
    /// Full name.
    #[validate(length(min = 1, message = "is required"))]
    pub nome: String,
    /// Job title.
    #[validate(length(min = 1, message = "is required"))]
    pub cargo: String,
    /// CPF document number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    /// E-mail.
    #[validate(email(message = "must be a valid e-mail address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Monthly salary.
    #[validate(range(min = 0.0, message = "must not be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salario: Option<f64>,
    /// Hiring date (`YYYY-MM-DD`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_admissao: Option<String>,
    /// Status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Shift.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turno: Option<String>,
}

/// Partial update of an employee. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct EmployeeUpdate {
    /// Full name.
    #[validate(length(min = 1, message = "must not be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    /// Job title.
    #[validate(length(min = 1, message = "must not be empty"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo: Option<String>,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    /// E-mail.
    #[validate(email(message = "must be a valid e-mail address"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Monthly salary.
    #[validate(range(min = 0.0, message = "must not be negative"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salario: Option<f64>,
    /// Status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Shift.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turno: Option<String>,
}

/// Employee endpoints.
#[derive(Debug, Clone)]
pub struct EmployeesApi {
    client: ApiClient,
}

impl EmployeesApi {
    /// Create the endpoint group.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List employees.
    pub async fn list(&self, filter: &EmployeeFilter) -> AppResult<Page<Employee>> {
        let request = ApiRequest::get(PATH)
            .page(filter.page)
            .query_opt("search", filter.search.as_deref())
            .query_opt("status", filter.status.as_deref())
            .query_opt("cargo", filter.cargo.as_deref());
        super::list(&self.client, request).await
    }

    /// Fetch one employee.
    pub async fn get(&self, id: &str) -> AppResult<Employee> {
        super::get(&self.client, format!("{PATH}/{id}")).await
    }

    /// Create an employee.
    pub async fn create(&self, employee: &NewEmployee) -> AppResult<Employee> {
        super::send_validated(&self.client, ApiRequest::post(PATH), employee).await
    }

    /// Update an employee.
    pub async fn update(&self, id: &str, changes: &EmployeeUpdate) -> AppResult<Employee> {
        super::send_validated(&self.client, ApiRequest::put(format!("{PATH}/{id}")), changes).await
    }

    /// Delete an employee.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        super::send_unit(&self.client, ApiRequest::delete(format!("{PATH}/{id}"))).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use irbana_core::error::ErrorKind;

    use super::*;
    use crate::client::test_support::*;
    use crate::request::RequestBody;

    #[tokio::test]
    async fn test_list_sends_filters_and_coerces_salary() {
        let h = logged_in().await;
        h.transport.push_json(
            200,
            json!({
                "success": true,
                "data": [
                    {"id": 1, "nome": "Ana", "cargo": "Operador", "salario": "3500.50"},
                    {"id": 2, "nome": "Bruno", "salario": null}
                ],
                "pagination": {"page": 1, "limit": 20, "total": 2, "pages": 1}
            }),
        );

        let api = EmployeesApi::new(h.client.clone());
        let filter = EmployeeFilter {
            search: Some("an".into()),
            cargo: Some("Operador".into()),
            ..Default::default()
        };
        let page = api.list(&filter).await.unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id, "1");
        assert_eq!(page.items[0].salario, Some(3500.5));
        assert_eq!(page.items[1].salario, None);
        assert_eq!(page.total(), 2);

        let url = &h.transport.requests()[0].url;
        assert!(url.contains("/api/funcionarios?page=1&limit=20&search=an&cargo=Operador"));
    }

    #[tokio::test]
    async fn test_create_requires_name_and_role() {
        let h = logged_in().await;
        let api = EmployeesApi::new(h.client.clone());
        let err = api.create(&NewEmployee::default()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("cargo"));
        assert!(err.message.contains("nome"));
        assert_eq!(h.transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_sends_only_changed_fields() {
        let h = logged_in().await;
        h.transport.push_json(
            200,
            json!({"success": true, "data": {"id": 5, "nome": "Ana", "status": "Inativo"}}),
        );

        let api = EmployeesApi::new(h.client.clone());
        let changes = EmployeeUpdate {
            status: Some("Inativo".into()),
            ..Default::default()
        };
        let updated = api.update("5", &changes).await.unwrap();
        assert_eq!(updated.status.as_deref(), Some("Inativo"));

        let sent = &h.transport.requests()[0];
        assert_eq!(sent.method, reqwest::Method::PUT);
        match &sent.body {
            RequestBody::Json(body) => assert_eq!(body, &json!({"status": "Inativo"})),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete() {
        let h = logged_in().await;
        h.transport.push_json(200, json!({"success": true, "message": "Funcionário removido"}));
        EmployeesApi::new(h.client.clone()).delete("9").await.unwrap();
        assert!(h.transport.requests()[0].url.ends_with("/api/funcionarios/9"));
    }
}
