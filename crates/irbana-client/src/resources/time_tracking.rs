//! Time clock records (`/ponto-eletronico/registros`).

use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use irbana_core::error::AppError;
use irbana_core::result::AppResult;
use irbana_core::types::PageQuery;
use irbana_core::types::money::deserialize_optional_amount;

use super::{Page, id_string};
use crate::client::ApiClient;
use crate::request::ApiRequest;

const PATH: &str = "/ponto-eletronico/registros";

/// A daily time clock record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeRecord {
    /// Identifier.
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Employee.
    pub funcionario_id: i64,
    /// Day (`YYYY-MM-DD`).
    pub data: String,
    /// Clock-in.
    #[serde(default)]
    pub entrada: Option<String>,
    /// Lunch break start.
    #[serde(default)]
    pub saida_almoco: Option<String>,
    /// Lunch break end.
    #[serde(default)]
    pub volta_almoco: Option<String>,
    /// Clock-out.
    #[serde(default)]
    pub saida: Option<String>,
    /// Hours worked.
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub horas_trabalhadas: Option<f64>,
    /// Overtime hours.
    #[serde(default, deserialize_with = "deserialize_optional_amount")]
    pub horas_extras: Option<f64>,
    /// Status (`Pendente Aprovação`, `Aprovado`, `Rejeitado`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Approver.
    #[serde(default)]
    pub aprovado_por: Option<i64>,
    /// Notes.
    #[serde(default)]
    pub observacoes: Option<String>,
}

/// Filters for [`TimeTrackingApi::list`].
#[derive(Debug, Clone, Default)]
pub struct TimeRecordFilter {
    /// Page selection.
    pub page: PageQuery,
    /// Employee filter.
    pub funcionario_id: Option<i64>,
    /// First day (inclusive).
    pub data_inicio: Option<String>,
    /// Last day (inclusive).
    pub data_fim: Option<String>,
    /// Status filter.
    pub status: Option<String>,
}

/// Payload for creating a record.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct NewTimeRecord {
    /// Employee.
    #[validate(range(min = 1, message = "is required"))]
    pub funcionario_id: i64,
    /// Day (`YYYY-MM-DD`).
    #[validate(length(equal = 10, message = "must be a YYYY-MM-DD date"))]
    pub data: String,
    /// Clock-in (`HH:MM`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrada: Option<String>,
    /// Lunch break start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saida_almoco: Option<String>,
    /// Lunch break end.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volta_almoco: Option<String>,
    /// Clock-out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saida: Option<String>,
    /// Notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

/// Time clock endpoints.
#[derive(Debug, Clone)]
pub struct TimeTrackingApi {
    client: ApiClient,
}

impl TimeTrackingApi {
    /// Create the endpoint group.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List records.
    pub async fn list(&self, filter: &TimeRecordFilter) -> AppResult<Page<TimeRecord>> {
        let request = ApiRequest::get(PATH)
            .page(filter.page)
            .query_opt("funcionario_id", filter.funcionario_id)
            .query_opt("data_inicio", filter.data_inicio.as_deref())
            .query_opt("data_fim", filter.data_fim.as_deref())
            .query_opt("status", filter.status.as_deref());
        super::list(&self.client, request).await
    }

    /// Create a record.
    pub async fn create(&self, record: &NewTimeRecord) -> AppResult<TimeRecord> {
        super::send_validated(&self.client, ApiRequest::post(PATH), record).await
    }

    /// Approve a record, optionally with a note.
    pub async fn approve(&self, id: &str, note: Option<&str>) -> AppResult<TimeRecord> {
        let request = ApiRequest::post(format!("{PATH}/{id}/aprovar"))
            .json_value(json!({ "observacoes_aprovacao": note.unwrap_or_default() }));
        self.client.fetch_data(&request).await
    }

    /// Reject a record with a reason.
    pub async fn reject(&self, id: &str, reason: &str) -> AppResult<TimeRecord> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::validation("motivo_rejeicao: is required"));
        }
        let request = ApiRequest::post(format!("{PATH}/{id}/rejeitar"))
            .json_value(json!({ "motivo_rejeicao": reason }));
        self.client.fetch_data(&request).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use irbana_core::error::ErrorKind;

    use super::*;
    use crate::client::test_support::*;
    use crate::request::RequestBody;

    fn record(status: &str) -> Value {
        json!({
            "id": "rp-1",
            "funcionario_id": 3,
            "data": "2026-03-02",
            "entrada": "07:00",
            "saida": "17:30",
            "horas_trabalhadas": "9.5",
            "horas_extras": 1.5,
            "status": status
        })
    }

    #[tokio::test]
    async fn test_record_with_data_field_is_not_unwrapped() {
        let h = logged_in().await;
        h.transport.push_json(200, json!({"success": true, "data": record("Aprovado")}));

        let approved = TimeTrackingApi::new(h.client.clone())
            .approve("rp-1", None)
            .await
            .unwrap();
        assert_eq!(approved.data, "2026-03-02");
        assert_eq!(approved.horas_trabalhadas, Some(9.5));

        let sent = &h.transport.requests()[0];
        assert!(sent.url.ends_with("/api/ponto-eletronico/registros/rp-1/aprovar"));
        match &sent.body {
            RequestBody::Json(body) => assert_eq!(body, &json!({"observacoes_aprovacao": ""})),
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reject_sends_reason() {
        let h = logged_in().await;
        h.transport.push_json(200, json!({"success": true, "data": record("Rejeitado")}));
        TimeTrackingApi::new(h.client.clone())
            .reject("rp-1", "Saída não registrada")
            .await
            .unwrap();
        match &h.transport.requests()[0].body {
            RequestBody::Json(body) => {
                assert_eq!(body, &json!({"motivo_rejeicao": "Saída não registrada"}))
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_period_filter() {
        let h = logged_in().await;
        h.transport.push_json(
            200,
            json!({"success": true, "data": [record("Pendente Aprovação")]}),
        );
        let filter = TimeRecordFilter {
            funcionario_id: Some(3),
            data_inicio: Some("2026-03-01".into()),
            data_fim: Some("2026-03-31".into()),
            ..Default::default()
        };
        let page = TimeTrackingApi::new(h.client.clone()).list(&filter).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert!(h.transport.requests()[0].url.ends_with(
            "?page=1&limit=20&funcionario_id=3&data_inicio=2026-03-01&data_fim=2026-03-31"
        ));
    }

    #[tokio::test]
    async fn test_create_requires_employee() {
        let h = logged_in().await;
        let record = NewTimeRecord {
            data: "2026-03-02".into(),
            ..Default::default()
        };
        let err = TimeTrackingApi::new(h.client.clone()).create(&record).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "funcionario_id: is required");
    }
}
