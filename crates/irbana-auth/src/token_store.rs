//! Token persistence.
//!
//! Tokens are opaque strings. They are written on login and after every
//! successful refresh, and removed on logout or when the session cannot be
//! renewed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use irbana_core::result::AppResult;
use irbana_core::traits::store::KeyValueStore;
use irbana_store::StoreManager;
use irbana_store::keys;

/// A stored token pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer credential sent with every request.
    pub access_token: String,
    /// Credential exchanged for a new access token.
    pub refresh_token: Option<String>,
    /// When the pair was obtained.
    pub issued_at: DateTime<Utc>,
}

impl Session {
    /// A session issued now.
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            issued_at: Utc::now(),
        }
    }
}

/// Reads and writes the session tokens.
#[derive(Debug, Clone)]
pub struct TokenStore {
    store: StoreManager,
}

impl TokenStore {
    /// Create a token store over a key-value store.
    pub fn new(store: StoreManager) -> Self {
        Self { store }
    }

    /// The underlying key-value store.
    pub fn store(&self) -> &StoreManager {
        &self.store
    }

    /// Current access token, falling back to the legacy `token` key.
    pub async fn access_token(&self) -> AppResult<Option<String>> {
        if let Some(token) = self.store.get(keys::ACCESS_TOKEN).await? {
            return Ok(Some(token));
        }
        self.store.get(keys::LEGACY_TOKEN).await
    }

    /// Current refresh token.
    pub async fn refresh_token(&self) -> AppResult<Option<String>> {
        self.store.get(keys::REFRESH_TOKEN).await
    }

    /// Replace the access token.
    pub async fn set_access_token(&self, token: &str) -> AppResult<()> {
        self.store.set(keys::ACCESS_TOKEN, token).await
    }

    /// Replace the refresh token.
    pub async fn set_refresh_token(&self, token: &str) -> AppResult<()> {
        self.store.set(keys::REFRESH_TOKEN, token).await
    }

    /// Persist a full session.
    pub async fn save_session(&self, session: &Session) -> AppResult<()> {
        self.set_access_token(&session.access_token).await?;
        match &session.refresh_token {
            Some(refresh) => self.set_refresh_token(refresh).await?,
            None => self.store.remove(keys::REFRESH_TOKEN).await?,
        }
        self.store
            .set(keys::SESSION_ISSUED_AT, &session.issued_at.to_rfc3339())
            .await?;
        debug!("Session tokens stored");
        Ok(())
    }

    /// The stored session, if an access token is present.
    pub async fn session(&self) -> AppResult<Option<Session>> {
        let Some(access_token) = self.access_token().await? else {
            return Ok(None);
        };
        let issued_at = self
            .store
            .get(keys::SESSION_ISSUED_AT)
            .await?
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);
        Ok(Some(Session {
            access_token,
            refresh_token: self.refresh_token().await?,
            issued_at,
        }))
    }

    /// Whether an access token is stored.
    pub async fn is_authenticated(&self) -> AppResult<bool> {
        Ok(self.access_token().await?.is_some())
    }

    /// Remove every session key.
    pub async fn clear(&self) -> AppResult<()> {
        self.store.remove_many(keys::SESSION_KEYS).await?;
        debug!("Session tokens cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_read() {
        let tokens = TokenStore::new(StoreManager::in_memory());
        tokens.set_access_token("abc").await.unwrap();
        assert_eq!(tokens.access_token().await.unwrap(), Some("abc".to_string()));
        assert!(tokens.is_authenticated().await.unwrap());
    }

    #[tokio::test]
    async fn test_access_token_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = irbana_store::FileStore::open(&path).await.unwrap();
        let tokens = TokenStore::new(StoreManager::from_store(std::sync::Arc::new(store)));
        tokens.set_access_token("persisted").await.unwrap();

        let reopened = irbana_store::FileStore::open(&path).await.unwrap();
        let tokens = TokenStore::new(StoreManager::from_store(std::sync::Arc::new(reopened)));
        assert_eq!(tokens.access_token().await.unwrap(), Some("persisted".to_string()));
    }

    #[tokio::test]
    async fn test_legacy_token_fallback() {
        let store = StoreManager::in_memory();
        store.set(keys::LEGACY_TOKEN, "old").await.unwrap();
        let tokens = TokenStore::new(store);
        assert_eq!(tokens.access_token().await.unwrap(), Some("old".to_string()));
    }

    #[tokio::test]
    async fn test_save_session_and_clear() {
        let tokens = TokenStore::new(StoreManager::in_memory());
        let session = Session::new("a1", Some("r1".to_string()));
        tokens.save_session(&session).await.unwrap();

        let loaded = tokens.session().await.unwrap().unwrap();
        assert_eq!(loaded.access_token, "a1");
        assert_eq!(loaded.refresh_token.as_deref(), Some("r1"));
        assert_eq!(loaded.issued_at.timestamp(), session.issued_at.timestamp());

        tokens.clear().await.unwrap();
        assert!(tokens.session().await.unwrap().is_none());
        assert!(tokens.refresh_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_keeps_unrelated_keys() {
        let store = StoreManager::in_memory();
        store.set("theme", "dark").await.unwrap();
        let tokens = TokenStore::new(store.clone());
        tokens.set_access_token("x").await.unwrap();
        tokens.clear().await.unwrap();
        assert_eq!(store.get("theme").await.unwrap(), Some("dark".to_string()));
    }
}
