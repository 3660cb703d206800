//! Canonical response envelope.
//!
//! The backend answers in several shapes: a bare array, a bare object,
//! `{success, data}`, `{data, pagination}`, and the doubly wrapped
//! `{success, data: {data, pagination}}`. [`Envelope::normalize`] maps all of
//! them to one shape.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::pagination::Pagination;
use crate::error::AppError;
use crate::result::AppResult;

/// Keys that may appear next to `data` in a wrapper object.
const WRAPPER_KEYS: &[&str] = &[
    "data",
    "pagination",
    "success",
    "message",
    "total",
    "page",
    "limit",
];

/// Normalized response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Whether the backend reported success. Missing flags count as success.
    pub success: bool,
    /// The payload.
    pub data: T,
    /// Pagination block, when the endpoint is paginated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Informational message sent alongside the payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope<Value> {
    /// Map any observed response shape to the canonical envelope.
    pub fn normalize(body: Value) -> Self {
        match body {
            Value::Object(map) => Self::from_object(map),
            other => Self {
                success: true,
                data: other,
                pagination: None,
                message: None,
            },
        }
    }

    fn from_object(mut map: Map<String, Value>) -> Self {
        let is_wrapper = map.contains_key("success") || map.contains_key("data");
        if !is_wrapper {
            return Self {
                success: true,
                data: Value::Object(map),
                pagination: None,
                message: None,
            };
        }

        let success = map.get("success").and_then(Value::as_bool).unwrap_or(true);
        let message = map
            .get("message")
            .and_then(Value::as_str)
            .map(String::from);
        let mut pagination = map.get("pagination").and_then(Pagination::from_value);

        let data = match map.remove("data") {
            Some(Value::Object(mut inner)) if is_nested_wrapper(&inner) => {
                if pagination.is_none() {
                    pagination = inner.get("pagination").and_then(Pagination::from_value);
                }
                inner.remove("data").unwrap_or(Value::Null)
            }
            Some(data) => data,
            None => Value::Null,
        };

        Self {
            success,
            data,
            pagination,
            message,
        }
    }

    /// Decode the payload into a typed envelope.
    pub fn decode<T: DeserializeOwned>(self) -> AppResult<Envelope<T>> {
        let data = serde_json::from_value(self.data).map_err(|e| {
            AppError::serialization(format!("Unexpected response payload: {e}"))
        })?;
        Ok(Envelope {
            success: self.success,
            data,
            pagination: self.pagination,
            message: self.message,
        })
    }

    /// Turn a `success: false` body into an error.
    pub fn into_result(self) -> AppResult<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(AppError::new(
                crate::error::ErrorKind::Http,
                self.message
                    .clone()
                    .unwrap_or_else(|| "The server rejected the request".to_string()),
            ))
        }
    }
}

/// An inner object is a wrapper only when its `data` is a container and it
/// carries nothing but wrapper keys; records may have a `data` (date) field.
fn is_nested_wrapper(inner: &Map<String, Value>) -> bool {
    matches!(inner.get("data"), Some(Value::Array(_)) | Some(Value::Object(_)))
        && inner.keys().all(|k| WRAPPER_KEYS.contains(&k.as_str()))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_bare_array() {
        let env = Envelope::normalize(json!([{"id": 1}, {"id": 2}]));
        assert!(env.success);
        assert_eq!(env.data.as_array().map(Vec::len), Some(2));
        assert!(env.pagination.is_none());
    }

    #[test]
    fn test_success_data_pagination() {
        let env = Envelope::normalize(json!({
            "success": true,
            "data": [{"id": 1}],
            "pagination": {"page": 1, "limit": 10, "total": 1, "pages": 1}
        }));
        assert_eq!(env.data, json!([{"id": 1}]));
        assert_eq!(env.pagination.map(|p| p.total), Some(1));
    }

    #[test]
    fn test_double_wrapped() {
        let env = Envelope::normalize(json!({
            "success": true,
            "data": {"data": [{"id": 7}], "pagination": {"page": 2, "limit": 1, "total": 5}}
        }));
        assert_eq!(env.data, json!([{"id": 7}]));
        let pagination = env.pagination.unwrap();
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.pages, 5);
    }

    #[test]
    fn test_record_with_date_field_is_not_unwrapped() {
        let env = Envelope::normalize(json!({
            "success": true,
            "data": {"id": 3, "data": "2024-05-01", "valor": "10.00"}
        }));
        assert_eq!(env.data["data"], json!("2024-05-01"));
        assert_eq!(env.data["id"], json!(3));
    }

    #[test]
    fn test_bare_object() {
        let env = Envelope::normalize(json!({"id": 9, "nome": "Grua 01"}));
        assert!(env.success);
        assert_eq!(env.data["nome"], json!("Grua 01"));
    }

    #[test]
    fn test_message_only() {
        let env = Envelope::normalize(json!({"success": true, "message": "Removido"}));
        assert_eq!(env.data, Value::Null);
        assert_eq!(env.message.as_deref(), Some("Removido"));
    }

    #[test]
    fn test_unsuccessful_body_becomes_error() {
        let env = Envelope::normalize(json!({"success": false, "message": "Obra bloqueada"}));
        let err = env.into_result().unwrap_err();
        assert_eq!(err.message, "Obra bloqueada");
    }

    #[test]
    fn test_decode_typed() {
        #[derive(Debug, Deserialize)]
        struct Item {
            id: u64,
        }
        let env = Envelope::normalize(json!({"data": [{"id": 4}]}));
        let typed: Envelope<Vec<Item>> = env.decode().unwrap();
        assert_eq!(typed.data[0].id, 4);
    }
}
