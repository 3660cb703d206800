//! Shared test helpers for end-to-end tests.
//!
//! [`MockBackend`] is a small axum server that imitates the IRBANA API:
//! bearer-checked resource routes, a rotating refresh endpoint and switches
//! for expiring the access token or failing the refresh.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use irbana_auth::RecordingNavigator;
use irbana_client::ApiClient;
use irbana_core::config::AppConfig;
use irbana_store::StoreManager;

/// Password accepted by the mock login.
pub const PASSWORD: &str = "secret";

/// Mutable backend state.
#[derive(Debug, Default)]
pub struct MockState {
    access: Mutex<Option<String>>,
    refresh: Mutex<Option<String>>,
    generation: AtomicU64,
    /// Calls made to the refresh endpoint.
    pub refresh_calls: AtomicUsize,
    /// When set, the refresh endpoint answers 401.
    pub fail_refresh: AtomicBool,
    /// Delay before the refresh endpoint answers.
    pub refresh_delay_ms: AtomicU64,
    /// Calls made to the crane list.
    pub crane_calls: AtomicUsize,
}

impl MockState {
    /// Invalidate the current access token; the refresh token stays valid.
    pub async fn expire_access(&self) {
        *self.access.lock().await = None;
    }

    /// The refresh token the server currently accepts.
    pub async fn current_refresh(&self) -> Option<String> {
        self.refresh.lock().await.clone()
    }

    async fn issue(&self) -> (String, String) {
        let n = self.generation.fetch_add(1, Ordering::SeqCst);
        let access = format!("access-{n}");
        let refresh = format!("refresh-{n}");
        *self.access.lock().await = Some(access.clone());
        *self.refresh.lock().await = Some(refresh.clone());
        (access, refresh)
    }

    async fn authorized(&self, headers: &HeaderMap) -> bool {
        let current = self.access.lock().await.clone();
        matches!((bearer(headers), current), (Some(sent), Some(valid)) if sent == valid)
    }
}

/// A running mock backend.
pub struct MockBackend {
    /// Origin such as `http://127.0.0.1:41234`.
    pub origin: String,
    /// Shared state for assertions and switches.
    pub state: Arc<MockState>,
}

impl MockBackend {
    /// Bind to an ephemeral port and serve in the background.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/refresh", post(refresh))
            .route("/api/auth/me", get(me))
            .route("/api/auth/logout", post(logout))
            .route("/api/gruas", get(cranes))
            .route("/api/clientes", get(customers))
            .route("/api/obras/{id}", get(work))
            .route("/api/obras/{id}/gruas", get(work_cranes))
            .route("/api/obras/{id}/funcionarios", get(work_employees))
            .route("/api/notas-fiscais", get(rate_limited))
            .route("/api/arquivos/upload/{obra_id}", post(upload))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            origin: format!("http://{addr}"),
            state,
        }
    }

    /// Client configuration pointing at this backend.
    pub fn config(&self) -> AppConfig {
        let mut config = AppConfig::default();
        config.api.base_url = Some(format!("{}/api", self.origin));
        config.api.timeout_seconds = 5;
        config
    }

    /// Client with an in-memory store and a recording navigator.
    pub async fn client(&self) -> (ApiClient, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::new());
        let client = ApiClient::builder(self.config())
            .store(StoreManager::in_memory())
            .navigator(navigator.clone())
            .build()
            .await
            .unwrap();
        (client, navigator)
    }
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(String::from)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"success": false, "message": "Token expirado", "code": "TOKEN_EXPIRED"})),
    )
        .into_response()
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if body["password"] != json!(PASSWORD) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Credenciais inválidas"})),
        )
            .into_response();
    }
    let (access, refresh) = state.issue().await;
    Json(json!({
        "success": true,
        "data": {
            "user": {"id": "u-1", "nome": "Ana Souza", "email": body["email"]},
            "profile": {"nome": "Administrador"},
            "access_token": access,
            "session": {"access_token": access, "refresh_token": refresh}
        }
    }))
    .into_response()
}

async fn refresh(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let delay = state.refresh_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let valid = state.current_refresh().await;
    let accepted = !state.fail_refresh.load(Ordering::SeqCst)
        && matches!((bearer(&headers), valid), (Some(sent), Some(valid)) if sent == valid);
    if !accepted {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "error": "Refresh token inválido"})),
        )
            .into_response();
    }

    let (access, refresh) = state.issue().await;
    Json(json!({
        "success": true,
        "data": {"access_token": access, "refresh_token": refresh}
    }))
    .into_response()
}

async fn me(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers).await {
        return unauthorized();
    }
    Json(json!({
        "success": true,
        "data": {
            "user": {"id": "u-1", "nome": "Ana Souza", "email": "ana@irbana.com"},
            "perfil": {"id": 1, "nome": "Supervisor", "nivel_acesso": 6},
            "permissoes": [{"nome": "obras:visualizar"}, {"nome": "gruas:visualizar"}]
        }
    }))
    .into_response()
}

async fn logout() -> Json<Value> {
    Json(json!({"success": true, "message": "Logout realizado"}))
}

async fn cranes(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers).await {
        return unauthorized();
    }
    state.crane_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "success": true,
        "data": [
            {"id": "GR-01", "name": "Liebherr 85 EC", "status": "disponivel", "valor_locacao": "12500.00"},
            {"id": "GR-02", "name": "Potain MC 85", "status": "em_obra"}
        ],
        "pagination": {"page": 1, "limit": 20, "total": 2, "pages": 1}
    }))
    .into_response()
}

async fn customers(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers).await {
        return unauthorized();
    }
    (
        StatusCode::FORBIDDEN,
        Json(json!({"success": false, "message": "Permissão insuficiente"})),
    )
        .into_response()
}

async fn work(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if !state.authorized(&headers).await {
        return unauthorized();
    }
    Json(json!({
        "success": true,
        "data": {"id": id, "nome": "Residencial Aurora", "status": "Em Andamento", "orcamento": "2500000.00"}
    }))
    .into_response()
}

async fn work_cranes(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
) -> Response {
    if !state.authorized(&headers).await {
        return unauthorized();
    }
    Json(json!({
        "success": true,
        "data": [{"id": 1, "grua_id": "GR-02", "valor_locacao_mensal": "9800.00", "status": "Ativa"}]
    }))
    .into_response()
}

async fn work_employees(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
) -> Response {
    if !state.authorized(&headers).await {
        return unauthorized();
    }
    Json(json!({
        "success": true,
        "data": [{"id": 5, "funcionario_id": 12, "cargo": "Operador de Grua"}]
    }))
    .into_response()
}

async fn rate_limited() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::RETRY_AFTER, "180")],
        Json(json!({"error": "Muitas requisições"})),
    )
        .into_response()
}

async fn upload(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(obra_id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    if !state.authorized(&headers).await {
        return unauthorized();
    }

    let mut file_name = None;
    let mut size = 0usize;
    let mut categoria = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        match field.name() {
            Some("arquivo") => {
                file_name = field.file_name().map(String::from);
                size = field.bytes().await.map(|b| b.len()).unwrap_or_default();
            }
            Some("categoria") => categoria = field.text().await.ok(),
            _ => {}
        }
    }

    let Some(file_name) = file_name else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Nenhum arquivo enviado"})),
        )
            .into_response();
    };
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": {
                "id": 99,
                "nome_original": file_name,
                "tamanho": size,
                "categoria": categoria,
                "caminho": format!("obras/{obra_id}/{file_name}")
            }
        })),
    )
        .into_response()
}
