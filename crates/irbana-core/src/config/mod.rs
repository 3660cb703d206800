//! Client configuration schemas.
//!
//! Configuration is deserialized from an optional TOML file merged with
//! environment variables via the `config` crate. Every section has defaults,
//! so an empty configuration is valid.

pub mod api;
pub mod auth;
pub mod cache;
pub mod logging;
pub mod retry;
pub mod store;
pub mod upload;

use serde::{Deserialize, Serialize};

pub use self::api::ApiConfig;
pub use self::auth::AuthConfig;
pub use self::cache::CacheConfig;
pub use self::logging::LoggingConfig;
pub use self::retry::RetryConfig;
pub use self::store::{StoreBackend, StoreConfig};
pub use self::upload::UploadConfig;

use crate::error::AppError;

/// Root client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Authentication and session teardown settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Token/profile key-value store settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Read cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Generic retry helper settings.
    #[serde(default)]
    pub retry: RetryConfig,
    /// File upload settings.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file (optional) and the environment.
    ///
    /// Environment variables prefixed with `IRBANA__` override file values
    /// (`IRBANA__API__TIMEOUT_SECONDS=5`). The legacy single-underscore
    /// variables (`IRBANA_API_BASE_URL`, `IRBANA_API_URL`,
    /// `IRBANA_STORAGE_PUBLIC_URL`) fill in values left unset.
    pub fn load(path: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("IRBANA")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        loaded.apply_env_fallbacks(|name| std::env::var(name).ok());
        Ok(loaded)
    }

    /// Fill unset values from the legacy environment variables.
    pub fn apply_env_fallbacks<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.api.base_url.is_none() {
            self.api.base_url = ["IRBANA_API_BASE_URL", "IRBANA_API_URL"]
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.trim().is_empty());
        }
        if self.upload.storage_public_url.is_none() {
            self.upload.storage_public_url = lookup("IRBANA_STORAGE_PUBLIC_URL")
                .filter(|value| !value.trim().is_empty());
        }
    }
}
