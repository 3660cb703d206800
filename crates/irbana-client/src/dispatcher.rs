//! Request dispatcher: one HTTP exchange, no refresh logic.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use irbana_core::error::AppError;
use irbana_core::result::AppResult;

use crate::rate_limit;
use crate::request::{ApiRequest, RequestBody};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};

/// Resolves [`ApiRequest`]s against the API root and turns responses into
/// JSON values or [`AppError`]s.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    transport: Arc<dyn HttpTransport>,
    api_root: String,
}

impl Dispatcher {
    /// Create a dispatcher for `api_root` (for example `http://host/api`).
    pub fn new(transport: Arc<dyn HttpTransport>, api_root: impl Into<String>) -> Self {
        Self {
            transport,
            api_root: api_root.into().trim_end_matches('/').to_string(),
        }
    }

    /// The API root requests are resolved against.
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    /// Absolute URL of a request, including its query string.
    pub fn url_for(&self, request: &ApiRequest) -> AppResult<String> {
        let mut url = Url::parse(&format!("{}{}", self.api_root, request.path))
            .map_err(|e| AppError::configuration(format!("Invalid request URL: {e}")))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                request
                    .query
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }
        Ok(url.to_string())
    }

    /// Send `request`, attaching `token` as a bearer credential when given.
    pub async fn dispatch(&self, request: &ApiRequest, token: Option<&str>) -> AppResult<Value> {
        let url = self.url_for(request)?;

        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        if let Some(token) = token {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        let has_content_type = request
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("content-type"));
        if matches!(request.body, RequestBody::Json(_)) && !has_content_type {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        headers.extend(request.headers.iter().cloned());

        let started = Instant::now();
        debug!(method = %request.method, url = %url, "Dispatching request");
        let response = self
            .transport
            .send(HttpRequest {
                method: request.method.clone(),
                url,
                headers,
                body: request.body.clone(),
            })
            .await?;
        debug!(
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );

        if response.is_success() {
            parse_success(&response)
        } else {
            Err(error_from_response(&response))
        }
    }
}

fn parse_success(response: &HttpResponse) -> AppResult<Value> {
    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&response.body).map_err(|e| {
        AppError::serialization(format!("Response is not valid JSON: {e}"))
    })
}

/// Build the error for a non-2xx response.
pub fn error_from_response(response: &HttpResponse) -> AppError {
    let status = response.status;
    let body: Option<Value> = serde_json::from_slice(&response.body).ok();

    if status == 429 {
        let retry_after = response
            .header("retry-after")
            .and_then(|v| rate_limit::parse_retry_after(v, Utc::now()));
        let mut err = AppError::http(status, rate_limit::message(retry_after))
            .with_retry_after(retry_after.unwrap_or(rate_limit::DEFAULT_WINDOW));
        if let Some(body) = body {
            err = err.with_body(body);
        }
        return err;
    }

    let message = body
        .as_ref()
        .and_then(|b| {
            ["message", "error"]
                .iter()
                .find_map(|field| b.get(field).and_then(Value::as_str))
        })
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Request failed with status {status}"));

    let mut err = AppError::http(status, message);
    if let Some(code) = body
        .as_ref()
        .and_then(|b| b.get("code"))
        .and_then(Value::as_str)
    {
        err = err.with_code(code);
    }
    if let Some(body) = body {
        err = err.with_body(body);
    }
    err
}
