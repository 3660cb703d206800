//! Backend API endpoint configuration.

use serde::{Deserialize, Serialize};

/// Default backend origin when neither configuration nor environment set one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend origin, with or without a trailing `/api`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ApiConfig {
    /// Backend origin without trailing slash or `/api` suffix.
    pub fn origin(&self) -> String {
        let raw = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_BASE_URL);
        let trimmed = raw.trim_end_matches('/');
        trimmed
            .strip_suffix("/api")
            .unwrap_or(trimmed)
            .to_string()
    }

    /// Root URL every API path is joined onto (`{origin}/api`).
    pub fn api_root(&self) -> String {
        format!("{}/api", self.origin())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("irbana-client/{}", env!("CARGO_PKG_VERSION"))
}
