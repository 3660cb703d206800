//! In-memory key-value store using dashmap.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use irbana_core::result::AppResult;
use irbana_core::traits::store::KeyValueStore;

/// Process-local store. Contents are lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    async fn keys(&self) -> AppResult<Vec<String>> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Ok(keys)
    }

    async fn clear(&self) -> AppResult<()> {
        let count = self.entries.len();
        self.entries.clear();
        debug!(count, "Cleared in-memory store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get() {
        let store = MemoryStore::new();
        store.set("access_token", "abc").await.unwrap();
        assert_eq!(store.get("access_token").await.unwrap(), Some("abc".to_string()));
    }

    #[tokio::test]
    async fn test_remove_many() {
        let store = MemoryStore::new();
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.set("c", "3").await.unwrap();
        store.remove_many(&["a", "b", "missing"]).await.unwrap();
        assert_eq!(store.keys().await.unwrap(), vec!["c".to_string()]);
    }

    #[tokio::test]
    async fn test_json_roundtrip() {
        let store = MemoryStore::new();
        let data = serde_json::json!({"nome": "Operador", "nivel_acesso": 4});
        store.set_json("user_perfil", &data).await.unwrap();
        let result: Option<serde_json::Value> = store.get_json("user_perfil").await.unwrap();
        assert_eq!(result, Some(data));
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let clone = store.clone();
        clone.set("k", "v").await.unwrap();
        assert!(store.contains("k").await.unwrap());
        store.clear().await.unwrap();
        assert!(!clone.contains("k").await.unwrap());
    }
}
