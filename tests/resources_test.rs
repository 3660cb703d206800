//! End-to-end tests for resource clients, uploads and the profile cache.

mod helpers;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use bytes::Bytes;

use irbana_client::resources::cranes::CraneFilter;
use irbana_client::resources::invoices::InvoiceFilter;
use irbana_client::resources::{CranesApi, InvoicesApi, WorksApi};
use irbana_client::{AuthApi, ProfileCache, UploadMetadata, Uploader};
use irbana_core::error::ErrorKind;

use helpers::{MockBackend, PASSWORD};

#[tokio::test]
async fn test_work_details_joins_allocations() {
    let backend = MockBackend::start().await;
    let (client, _navigator) = backend.client().await;
    AuthApi::new(client.clone())
        .login("ana@irbana.com", PASSWORD)
        .await
        .unwrap();

    let details = WorksApi::new(client.clone()).details("7").await.unwrap();
    assert_eq!(details.work.id, "7");
    assert_eq!(details.work.orcamento, Some(2_500_000.0));
    assert_eq!(details.cranes[0].valor_locacao_mensal, Some(9800.0));
    assert_eq!(details.employees[0].funcionario_id, Some(12));
}

#[tokio::test]
async fn test_cached_list_is_served_once() {
    let backend = MockBackend::start().await;
    let (client, _navigator) = backend.client().await;
    AuthApi::new(client.clone())
        .login("ana@irbana.com", PASSWORD)
        .await
        .unwrap();

    let api = CranesApi::new(client.clone());
    let filter = CraneFilter::default();
    let (a, b) = tokio::join!(api.list(&filter), api.list(&filter));
    assert_eq!(a.unwrap().items.len(), 2);
    assert_eq!(b.unwrap().items.len(), 2);
    api.list(&filter).await.unwrap();
    assert_eq!(backend.state.crane_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rate_limit_message_uses_retry_after() {
    let backend = MockBackend::start().await;
    let (client, _navigator) = backend.client().await;
    AuthApi::new(client.clone())
        .login("ana@irbana.com", PASSWORD)
        .await
        .unwrap();

    let err = InvoicesApi::new(client.clone())
        .list(&InvoiceFilter::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::RateLimit);
    assert_eq!(err.message, "Too many attempts. Try again in 3 minutes.");
    assert_eq!(err.retry_after, Some(std::time::Duration::from_secs(180)));
}

#[tokio::test]
async fn test_upload_resolves_relative_path() {
    let backend = MockBackend::start().await;
    let (client, _navigator) = backend.client().await;
    AuthApi::new(client.clone())
        .login("ana@irbana.com", PASSWORD)
        .await
        .unwrap();

    let metadata = UploadMetadata {
        categoria: Some("laudos".into()),
        descricao: Some("Laudo de inspeção".into()),
    };
    let file = Uploader::new(client.clone())
        .upload_bytes(
            "7",
            "laudo.pdf",
            "application/pdf",
            Bytes::from_static(b"%PDF-1.7"),
            metadata,
        )
        .await
        .unwrap();

    assert_eq!(file.tamanho, Some(8));
    assert_eq!(file.categoria.as_deref(), Some("laudos"));
    assert_eq!(
        file.url.unwrap(),
        format!("{}/uploads/obras/7/laudo.pdf", backend.origin)
    );
}

#[tokio::test]
async fn test_profile_is_loaded_and_normalized() {
    let backend = MockBackend::start().await;
    let (client, _navigator) = backend.client().await;
    AuthApi::new(client.clone())
        .login("ana@irbana.com", PASSWORD)
        .await
        .unwrap();

    let profiles = ProfileCache::new(client.clone());
    let profile = profiles.get().await.unwrap();
    assert_eq!(profile.role, "supervisor");
    assert_eq!(profile.level, Some(6));
    assert!(profile.has_permission("gruas:visualizar"));
    assert!(!profile.has_permission("financeiro:editar"));

    let again = profiles.get().await.unwrap();
    assert!(Arc::ptr_eq(&profile, &again));
}
