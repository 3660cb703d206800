//! Multipart file upload and public URL resolution.

use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use irbana_core::config::upload::UploadConfig;
use irbana_core::error::AppError;
use irbana_core::result::AppResult;

use crate::client::ApiClient;
use crate::request::{ApiRequest, MultipartForm};

/// Metadata of a stored file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    /// File identifier.
    #[serde(default)]
    pub id: Value,
    /// Name the file was uploaded with.
    #[serde(default)]
    pub nome_original: Option<String>,
    /// Name under which the server stored the file.
    #[serde(default)]
    pub nome_arquivo: Option<String>,
    /// Size in bytes.
    #[serde(default)]
    pub tamanho: Option<u64>,
    /// MIME type.
    #[serde(default)]
    pub tipo_mime: Option<String>,
    /// Category.
    #[serde(default)]
    pub categoria: Option<String>,
    /// Free-text description.
    #[serde(default)]
    pub descricao: Option<String>,
    /// Storage-relative path.
    #[serde(default)]
    pub caminho: Option<String>,
    /// Public URL. Filled from `caminho` when the server only sends a path.
    #[serde(default)]
    pub url: Option<String>,
}

/// Metadata sent with an upload.
#[derive(Debug, Clone, Default)]
pub struct UploadMetadata {
    /// Category (`geral` when empty).
    pub categoria: Option<String>,
    /// Free-text description.
    pub descricao: Option<String>,
}

/// Uploads files attached to a construction site.
#[derive(Debug, Clone)]
pub struct Uploader {
    client: ApiClient,
    config: UploadConfig,
}

impl Uploader {
    /// Create an uploader using the client's upload configuration.
    pub fn new(client: ApiClient) -> Self {
        let config = client.config().upload.clone();
        Self { client, config }
    }

    /// Upload a file from disk.
    pub async fn upload_path(
        &self,
        obra_id: &str,
        path: &Path,
        metadata: UploadMetadata,
    ) -> AppResult<UploadedFile> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::validation(format!("Invalid file path: {}", path.display())))?
            .to_string();
        let size = tokio::fs::metadata(path).await?.len();
        self.check_size(size)?;
        let bytes = tokio::fs::read(path).await?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        self.upload_bytes(obra_id, &file_name, mime.essence_str(), bytes.into(), metadata)
            .await
    }

    /// Upload in-memory contents.
    pub async fn upload_bytes(
        &self,
        obra_id: &str,
        file_name: &str,
        mime: &str,
        bytes: Bytes,
        metadata: UploadMetadata,
    ) -> AppResult<UploadedFile> {
        self.check_size(bytes.len() as u64)?;

        let mut form = MultipartForm::new()
            .file(self.config.file_field.clone(), file_name, mime, bytes)
            .text(
                "categoria",
                metadata.categoria.unwrap_or_else(|| "geral".to_string()),
            );
        if let Some(descricao) = metadata.descricao.filter(|d| !d.trim().is_empty()) {
            form = form.text("descricao", descricao);
        }

        let request = ApiRequest::post(format!("/arquivos/upload/{obra_id}")).multipart(form);
        let mut uploaded: UploadedFile = self.client.fetch_data(&request).await?;
        uploaded.url = uploaded
            .url
            .as_deref()
            .or(uploaded.caminho.as_deref())
            .or(uploaded.nome_arquivo.as_deref())
            .map(|u| self.resolve_url(u));

        info!(obra_id, file_name, "File uploaded");
        Ok(uploaded)
    }

    /// Turn a server-returned location into a public URL.
    ///
    /// Absolute URLs pass through. Relative paths resolve against the storage
    /// public URL, or the API origin's `/uploads` when none is configured.
    pub fn resolve_url(&self, location: &str) -> String {
        resolve_public_url(
            location,
            self.config.storage_public_url.as_deref(),
            &self.config.bucket,
            &self.client.origin(),
        )
    }

    fn check_size(&self, size: u64) -> AppResult<()> {
        let max = self.config.max_size_mb * 1024 * 1024;
        if size > max {
            return Err(AppError::validation(format!(
                "File is too large. Maximum allowed: {}MB",
                self.config.max_size_mb
            )));
        }
        Ok(())
    }
}

/// Resolve `location` to an absolute URL.
pub fn resolve_public_url(
    location: &str,
    storage_public_url: Option<&str>,
    bucket: &str,
    origin: &str,
) -> String {
    if location.starts_with("http://") || location.starts_with("https://") {
        return location.to_string();
    }
    let path = location.trim_start_matches('/');
    match storage_public_url.map(|u| u.trim_end_matches('/')).filter(|u| !u.is_empty()) {
        Some(storage) => format!("{storage}/storage/v1/object/public/{bucket}/{path}"),
        None => format!("{}/uploads/{path}", origin.trim_end_matches('/')),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use irbana_core::error::ErrorKind;

    use super::*;
    use crate::client::test_support::*;
    use crate::request::RequestBody;

    #[test]
    fn test_resolve_public_url() {
        assert_eq!(
            resolve_public_url("https://cdn.test/a.pdf", Some("https://s.test"), "b", "http://o"),
            "https://cdn.test/a.pdf"
        );
        assert_eq!(
            resolve_public_url(
                "/obras/1/a.pdf",
                Some("https://s.test/"),
                "arquivos-obras",
                "http://o"
            ),
            "https://s.test/storage/v1/object/public/arquivos-obras/obras/1/a.pdf"
        );
        assert_eq!(
            resolve_public_url("obras/1/a.pdf", None, "arquivos-obras", "http://localhost:3001"),
            "http://localhost:3001/uploads/obras/1/a.pdf"
        );
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_and_resolves_url() {
        let h = logged_in().await;
        h.transport.push_json(
            201,
            json!({"success": true, "data": {
                "id": "f1",
                "nome_original": "laudo.pdf",
                "caminho": "obras/7/laudo.pdf",
                "categoria": "laudos"
            }}),
        );

        let uploader = Uploader::new(h.client.clone());
        let metadata = UploadMetadata {
            categoria: Some("laudos".into()),
            descricao: None,
        };
        let file = uploader
            .upload_bytes(
                "7",
                "laudo.pdf",
                "application/pdf",
                Bytes::from_static(b"%PDF"),
                metadata,
            )
            .await
            .unwrap();
        assert_eq!(
            file.url.as_deref(),
            Some("http://localhost:3001/uploads/obras/7/laudo.pdf")
        );

        let sent = &h.transport.requests()[0];
        assert!(sent.url.ends_with("/api/arquivos/upload/7"));
        assert!(!sent.headers.iter().any(|(k, _)| k == "content-type"));
        match &sent.body {
            RequestBody::Multipart(form) => {
                assert_eq!(form.files[0].field, "arquivo");
                assert_eq!(form.fields, vec![("categoria".to_string(), "laudos".to_string())]);
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected_locally() {
        let h = logged_in().await;
        let uploader = Uploader::new(h.client.clone());
        let big = Bytes::from(vec![0u8; 10 * 1024 * 1024 + 1]);
        let err = uploader
            .upload_bytes(
                "1",
                "big.bin",
                "application/octet-stream",
                big,
                UploadMetadata::default(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(h.transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_from_disk_guesses_mime() {
        let h = logged_in().await;
        h.transport.push_json(201, json!({"data": {"id": 1, "url": "https://cdn.test/x.png"}}));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foto.png");
        tokio::fs::write(&path, b"\x89PNG").await.unwrap();

        let file = Uploader::new(h.client.clone())
            .upload_path("3", &path, UploadMetadata::default())
            .await
            .unwrap();
        assert_eq!(file.url.as_deref(), Some("https://cdn.test/x.png"));
        match &h.transport.requests()[0].body {
            RequestBody::Multipart(form) => assert_eq!(form.files[0].mime, "image/png"),
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
