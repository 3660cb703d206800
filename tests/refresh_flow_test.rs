//! End-to-end tests for token refresh and session teardown.

mod helpers;

use std::sync::atomic::Ordering;
use std::time::Duration;

use tokio::task::JoinSet;

use irbana_client::resources::CranesApi;
use irbana_client::resources::cranes::CraneFilter;
use irbana_client::{ApiRequest, AuthApi};
use irbana_core::error::ErrorKind;

use helpers::{MockBackend, PASSWORD};

#[tokio::test]
async fn test_concurrent_rejections_share_one_refresh() {
    let backend = MockBackend::start().await;
    let (client, navigator) = backend.client().await;
    AuthApi::new(client.clone())
        .login("ana@irbana.com", PASSWORD)
        .await
        .unwrap();

    backend.state.expire_access().await;
    backend.state.refresh_delay_ms.store(100, Ordering::SeqCst);

    let mut tasks = JoinSet::new();
    for _ in 0..5 {
        let client = client.clone();
        tasks.spawn(async move { client.execute(&ApiRequest::get("/gruas")).await });
    }
    while let Some(result) = tasks.join_next().await {
        let body = result.unwrap().unwrap();
        assert_eq!(body["data"][0]["id"], "GR-01");
    }

    assert_eq!(backend.state.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        client.tokens().refresh_token().await.unwrap(),
        backend.state.current_refresh().await
    );
    assert!(!client.coordinator().is_refreshing().await);
    assert_eq!(navigator.count().await, 0);
}

#[tokio::test]
async fn test_failed_refresh_rejects_everyone_and_navigates_once() {
    let backend = MockBackend::start().await;
    let (client, navigator) = backend.client().await;
    AuthApi::new(client.clone())
        .login("ana@irbana.com", PASSWORD)
        .await
        .unwrap();

    backend.state.expire_access().await;
    backend.state.fail_refresh.store(true, Ordering::SeqCst);
    backend.state.refresh_delay_ms.store(200, Ordering::SeqCst);

    let mut tasks = JoinSet::new();
    for _ in 0..3 {
        let client = client.clone();
        tasks.spawn(async move { client.execute(&ApiRequest::get("/gruas")).await });
    }
    while let Some(result) = tasks.join_next().await {
        let err = result.unwrap().unwrap_err();
        assert_eq!(err.message, "Refresh token inválido");
    }

    assert_eq!(backend.state.refresh_calls.load(Ordering::SeqCst), 1);
    assert!(!client.is_authenticated().await.unwrap());
    assert!(client.tokens().refresh_token().await.unwrap().is_none());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(navigator.visits().await, vec!["/".to_string()]);
}

#[tokio::test]
async fn test_refreshed_session_serves_typed_resources() {
    let backend = MockBackend::start().await;
    let (client, _navigator) = backend.client().await;
    AuthApi::new(client.clone())
        .login("ana@irbana.com", PASSWORD)
        .await
        .unwrap();
    backend.state.expire_access().await;

    let page = CranesApi::new(client.clone())
        .list(&CraneFilter::default())
        .await
        .unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].valor_locacao, Some(12500.0));
    assert_eq!(page.total(), 2);
    assert_eq!(backend.state.refresh_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_permission_denied_keeps_session() {
    let backend = MockBackend::start().await;
    let (client, navigator) = backend.client().await;
    AuthApi::new(client.clone())
        .login("ana@irbana.com", PASSWORD)
        .await
        .unwrap();

    let err = client
        .execute(&ApiRequest::get("/clientes"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authorization);
    assert_eq!(err.message, "Permissão insuficiente");
    assert_eq!(backend.state.refresh_calls.load(Ordering::SeqCst), 0);
    assert!(client.is_authenticated().await.unwrap());
    assert_eq!(navigator.count().await, 0);
}

#[tokio::test]
async fn test_bad_credentials_surface_without_refresh() {
    let backend = MockBackend::start().await;
    let (client, navigator) = backend.client().await;

    let err = AuthApi::new(client.clone())
        .login("ana@irbana.com", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(err.message, "Credenciais inválidas");
    assert_eq!(backend.state.refresh_calls.load(Ordering::SeqCst), 0);
    assert_eq!(navigator.count().await, 0);
}

#[tokio::test]
async fn test_unreachable_backend_without_session_navigates() {
    let backend = MockBackend::start().await;
    let mut config = backend.config();
    config.api.base_url = Some("http://127.0.0.1:9".to_string());
    let navigator = std::sync::Arc::new(irbana_auth::RecordingNavigator::new());
    let client = irbana_client::ApiClient::builder(config)
        .store(irbana_store::StoreManager::in_memory())
        .navigator(navigator.clone())
        .build()
        .await
        .unwrap();

    let err = client.execute(&ApiRequest::get("/gruas")).await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(navigator.count().await, 1);
}
