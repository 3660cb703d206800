//! Vacation requests (`/ferias/ferias`).

use serde::{Deserialize, Serialize};
use serde_json::json;
use validator::Validate;

use irbana_core::error::AppError;
use irbana_core::result::AppResult;

use super::{Page, id_string};
use crate::client::ApiClient;
use crate::request::ApiRequest;

const PATH: &str = "/ferias/ferias";

/// Status written when a request is rejected.
pub const REJECTED_STATUS: &str = "Rejeitado";

/// A vacation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vacation {
    /// Identifier.
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Employee.
    pub funcionario_id: i64,
    /// First day off.
    pub data_inicio: String,
    /// Last day off.
    pub data_fim: String,
    /// Requested days.
    #[serde(default)]
    pub dias_solicitados: u32,
    /// Balance before the request.
    #[serde(default)]
    pub saldo_anterior: Option<i64>,
    /// Balance after the request.
    #[serde(default)]
    pub saldo_restante: Option<i64>,
    /// Status (`Solicitado`, `Aprovado`, `Em Andamento`, `Finalizado`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Notes.
    #[serde(default)]
    pub observacoes: Option<String>,
    /// Approver.
    #[serde(default)]
    pub aprovado_por: Option<i64>,
    /// Approval timestamp.
    #[serde(default)]
    pub data_aprovacao: Option<String>,
}

/// Filters for [`VacationsApi::list`].
#[derive(Debug, Clone, Default)]
pub struct VacationFilter {
    /// Employee filter.
    pub funcionario_id: Option<i64>,
    /// Status filter.
    pub status: Option<String>,
}

/// Payload for requesting a vacation.
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[validate(schema(function = "validate_period"))]
pub struct NewVacation {
    /// Employee.
    #[validate(range(min = 1, message = "is required"))]
    pub funcionario_id: i64,
    /// First day off (`YYYY-MM-DD`).
    #[validate(length(equal = 10, message = "must be a YYYY-MM-DD date"))]
    pub data_inicio: String,
    /// Last day off (`YYYY-MM-DD`).
    #[validate(length(equal = 10, message = "must be a YYYY-MM-DD date"))]
    pub data_fim: String,
    /// Requested days.
    #[validate(range(min = 1, max = 30, message = "must be between 1 and 30"))]
    pub dias_solicitados: u32,
    /// Notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
}

fn validate_period(vacation: &NewVacation) -> Result<(), validator::ValidationError> {
    let parse = |s: &str| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
    match (parse(&vacation.data_inicio), parse(&vacation.data_fim)) {
        (Some(start), Some(end)) if end < start => {
            let mut err = validator::ValidationError::new("period");
            err.message = Some("data_fim must not be before data_inicio".into());
            Err(err)
        }
        _ => Ok(()),
    }
}

/// Vacation endpoints.
#[derive(Debug, Clone)]
pub struct VacationsApi {
    client: ApiClient,
}

impl VacationsApi {
    /// Create the endpoint group.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List vacation requests.
    pub async fn list(&self, filter: &VacationFilter) -> AppResult<Page<Vacation>> {
        let request = ApiRequest::get(PATH)
            .query_opt("funcionario_id", filter.funcionario_id)
            .query_opt("status", filter.status.as_deref());
        super::list(&self.client, request).await
    }

    /// Request a vacation.
    pub async fn create(&self, vacation: &NewVacation) -> AppResult<Vacation> {
        super::send_validated(&self.client, ApiRequest::post(PATH), vacation).await
    }

    /// Approve a request on behalf of `approver_id`.
    pub async fn approve(&self, id: &str, approver_id: i64) -> AppResult<Vacation> {
        let request = ApiRequest::post(format!("{PATH}/{id}/aprovar"))
            .json_value(json!({ "aprovado_por": approver_id }));
        self.client.fetch_data(&request).await
    }

    /// Reject a request, recording the reason in its notes.
    pub async fn reject(&self, id: &str, reason: &str) -> AppResult<Vacation> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(AppError::validation("motivo: is required"));
        }
        let request = ApiRequest::put(format!("{PATH}/{id}"))
            .json_value(json!({ "status": REJECTED_STATUS, "observacoes": reason }));
        self.client.fetch_data(&request).await
    }
}
