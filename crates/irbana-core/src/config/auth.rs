//! Authentication endpoint and session teardown configuration.

use serde::{Deserialize, Serialize};

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Login endpoint, relative to the API root.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// Token refresh endpoint, relative to the API root.
    #[serde(default = "default_refresh_path")]
    pub refresh_path: String,
    /// Current-user endpoint, relative to the API root.
    #[serde(default = "default_me_path")]
    pub me_path: String,
    /// Logout endpoint, relative to the API root.
    #[serde(default = "default_logout_path")]
    pub logout_path: String,
    /// Path fragments of endpoints whose auth failures are surfaced as-is
    /// (never refreshed, never torn down).
    #[serde(default = "default_excluded_paths")]
    pub excluded_paths: Vec<String>,
    /// Lower-case phrases that mark an error message as authentication-related.
    #[serde(default = "default_auth_phrases")]
    pub auth_phrases: Vec<String>,
    /// Machine-readable backend error codes that mark an authentication failure.
    #[serde(default = "default_auth_error_codes")]
    pub auth_error_codes: Vec<String>,
    /// Window after a teardown during which further triggers are ignored.
    #[serde(default = "default_debounce")]
    pub teardown_debounce_ms: u64,
    /// Window used to detect a redirect loop.
    #[serde(default = "default_loop_window")]
    pub loop_window_seconds: u64,
    /// Teardowns allowed inside the loop window before navigation stops.
    #[serde(default = "default_max_teardowns")]
    pub max_teardowns_in_window: u32,
    /// Login entry point the navigator is sent to.
    #[serde(default = "default_login_entry")]
    pub login_entry: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            refresh_path: default_refresh_path(),
            me_path: default_me_path(),
            logout_path: default_logout_path(),
            excluded_paths: default_excluded_paths(),
            auth_phrases: default_auth_phrases(),
            auth_error_codes: default_auth_error_codes(),
            teardown_debounce_ms: default_debounce(),
            loop_window_seconds: default_loop_window(),
            max_teardowns_in_window: default_max_teardowns(),
            login_entry: default_login_entry(),
        }
    }
}

fn default_login_path() -> String {
    "/auth/login".to_string()
}

fn default_refresh_path() -> String {
    "/auth/refresh".to_string()
}

fn default_me_path() -> String {
    "/auth/me".to_string()
}

fn default_logout_path() -> String {
    "/auth/logout".to_string()
}

fn default_excluded_paths() -> Vec<String> {
    vec!["/auth/login".to_string(), "/auth/refresh".to_string()]
}

fn default_auth_phrases() -> Vec<String> {
    [
        "token expirado",
        "token inválido",
        "não autorizado",
        "acesso negado",
        "authentication failed",
        "invalid token",
        "token expired",
        "unauthorized",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_auth_error_codes() -> Vec<String> {
    [
        "TOKEN_EXPIRED",
        "INVALID_TOKEN",
        "TOKEN_MISSING",
        "UNAUTHORIZED",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_debounce() -> u64 {
    2000
}

fn default_loop_window() -> u64 {
    5
}

fn default_max_teardowns() -> u32 {
    3
}

fn default_login_entry() -> String {
    "/".to_string()
}
