//! Store manager that dispatches to the configured backend.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use irbana_core::config::store::{StoreBackend, StoreConfig};
use irbana_core::result::AppResult;
use irbana_core::traits::store::KeyValueStore;

/// Store manager that wraps the configured key-value backend.
///
/// The backend is selected at construction time based on configuration.
#[derive(Debug, Clone)]
pub struct StoreManager {
    /// The inner store.
    inner: Arc<dyn KeyValueStore>,
}

impl StoreManager {
    /// Create a new store manager from configuration.
    pub async fn new(config: &StoreConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.backend {
            StoreBackend::Memory => {
                info!("Initializing in-memory session store");
                Arc::new(crate::memory::MemoryStore::new())
            }
            StoreBackend::File => {
                info!(path = %config.path, "Initializing file session store");
                Arc::new(crate::file::FileStore::open(&config.path).await?)
            }
        };

        Ok(Self { inner })
    }

    /// Create a store manager from an existing store (for testing).
    pub fn from_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self { inner: store }
    }

    /// A manager over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(crate::memory::MemoryStore::new()))
    }

    /// Get a reference to the inner store.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.inner.as_ref()
    }
}

#[async_trait]
impl KeyValueStore for StoreManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.inner.set(key, value).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.inner.remove(key).await
    }

    async fn remove_many(&self, keys: &[&str]) -> AppResult<()> {
        self.inner.remove_many(keys).await
    }

    async fn contains(&self, key: &str) -> AppResult<bool> {
        self.inner.contains(key).await
    }

    async fn keys(&self) -> AppResult<Vec<String>> {
        self.inner.keys().await
    }

    async fn clear(&self) -> AppResult<()> {
        self.inner.clear().await
    }
}
