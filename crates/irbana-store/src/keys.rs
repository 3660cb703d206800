//! Storage key names and cache key builders.
//!
//! Centralising key construction prevents typos and makes it easy to find
//! every key the client persists.

// ── Session keys ───────────────────────────────────────────

/// Current access token.
pub const ACCESS_TOKEN: &str = "access_token";

/// Access token under the name used by older releases. Read-only fallback.
pub const LEGACY_TOKEN: &str = "token";

/// Current refresh token.
pub const REFRESH_TOKEN: &str = "refresh_token";

/// RFC 3339 timestamp of the last login or refresh.
pub const SESSION_ISSUED_AT: &str = "session_issued_at";

/// Every key that belongs to the token session.
pub const SESSION_KEYS: &[&str] = &[ACCESS_TOKEN, LEGACY_TOKEN, REFRESH_TOKEN, SESSION_ISSUED_AT];

// ── Profile keys ───────────────────────────────────────────

/// Full `/auth/me` payload.
pub const USER_PROFILE: &str = "user_profile";

/// Access profile (`perfil`) of the user.
pub const USER_PERFIL: &str = "user_perfil";

/// Raw permission objects (`permissoes`).
pub const USER_PERMISSOES: &str = "user_permissoes";

/// Flattened permission names.
pub const USER_PERMISSIONS: &str = "user_permissions";

/// Basic user record.
pub const USER_DATA: &str = "user_data";

/// Normalized role name.
pub const USER_ROLE: &str = "user_role";

/// Access level (`nivel_acesso`).
pub const USER_LEVEL: &str = "user_level";

/// Every key derived from the user profile.
pub const PROFILE_KEYS: &[&str] = &[
    USER_PROFILE,
    USER_PERFIL,
    USER_PERMISSOES,
    USER_PERMISSIONS,
    USER_DATA,
    USER_ROLE,
    USER_LEVEL,
];

// ── Read cache keys ────────────────────────────────────────

/// Cache key for an idempotent read: method, absolute URL and any extra
/// options that change the response (such as the caller's token scope).
pub fn read_cache_key(method: &str, url: &str, options: &str) -> String {
    if options.is_empty() {
        format!("{}:{url}", method.to_uppercase())
    } else {
        format!("{}:{url}:{options}", method.to_uppercase())
    }
}
