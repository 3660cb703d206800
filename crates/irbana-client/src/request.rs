//! Request description passed through the client pipeline.

use bytes::Bytes;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use irbana_core::result::AppResult;
use irbana_core::types::PageQuery;

/// A file attached to a multipart body.
#[derive(Debug, Clone)]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name sent to the server.
    pub file_name: String,
    /// MIME type.
    pub mime: String,
    /// File contents.
    pub bytes: Bytes,
}

/// A multipart form that can be rebuilt for a retry.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    /// Plain text fields, in insertion order.
    pub fields: Vec<(String, String)>,
    /// File fields.
    pub files: Vec<FilePart>,
}

impl MultipartForm {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// Add a file field.
    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        self.files.push(FilePart {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes: bytes.into(),
        });
        self
    }
}

/// Request body.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// JSON document.
    Json(Value),
    /// Multipart form.
    Multipart(MultipartForm),
}

/// An API call relative to the API root (`/funcionarios`, `/auth/me`).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path below the API root, starting with `/`.
    pub path: String,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// Body.
    pub body: RequestBody,
    /// Whether the bearer token is attached and refresh applies.
    pub authenticated: bool,
    /// Whether a GET may be served from the short-lived read cache.
    pub cacheable: bool,
}

impl ApiRequest {
    /// Create a request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') { path } else { format!("/{path}") };
        Self {
            method,
            path,
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
            authenticated: true,
            cacheable: false,
        }
    }

    /// `GET path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT path`.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `PATCH path`.
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Add a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Add a query parameter when a value is present and not blank.
    pub fn query_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value.map(|v| v.to_string()).filter(|v| !v.trim().is_empty()) {
            Some(v) => self.query(name, v),
            None => self,
        }
    }

    /// Add `page` and `limit`.
    pub fn page(mut self, page: PageQuery) -> Self {
        self.query.extend(page.to_pairs());
        self
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> AppResult<Self> {
        self.body = RequestBody::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Set a JSON body from an already built value.
    pub fn json_value(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    /// Set a multipart body.
    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    /// Send without a bearer token and bypass refresh handling.
    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    /// Allow the response to be served from the read cache.
    pub fn cached(mut self) -> Self {
        self.cacheable = true;
        self
    }

    /// Whether this is an idempotent read.
    pub fn is_read(&self) -> bool {
        self.method == Method::GET
    }
}
