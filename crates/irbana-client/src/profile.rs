//! Current-user profile cache.
//!
//! `/auth/me` is fetched at most once per TTL; concurrent callers share the
//! in-flight request. Each successful load is mirrored into the key-value
//! store so that a later failure can fall back to the last known profile.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use irbana_core::error::AppError;
use irbana_core::result::AppResult;
use irbana_core::traits::store::KeyValueStore;
use irbana_store::keys;

use crate::client::ApiClient;
use crate::request::ApiRequest;

const PROFILE_KEY: &str = "me";

/// Access profile (`perfil`) attached to a user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Perfil {
    /// Profile identifier.
    #[serde(default)]
    pub id: Option<Value>,
    /// Profile name, such as `Administrador` or `Operador`.
    #[serde(default)]
    pub nome: Option<String>,
    /// Numeric access level.
    #[serde(default)]
    pub nivel_acesso: Option<u32>,
}

/// The authenticated user with access profile and permissions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User record as returned by the server.
    pub user: Value,
    /// Access profile.
    pub perfil: Option<Perfil>,
    /// Raw permission objects.
    pub permissoes: Vec<Value>,
    /// Permission names.
    pub permissions: Vec<String>,
    /// Normalized role name.
    pub role: String,
    /// Access level, when known.
    pub level: Option<u32>,
}

impl UserProfile {
    /// Build from an `/auth/me` payload.
    pub fn from_payload(data: &Value) -> Self {
        let mut user = data.get("user").cloned().unwrap_or(Value::Null);
        if let (Some(profile), Value::Object(map)) = (data.get("profile"), &mut user) {
            map.insert("profile".to_string(), profile.clone());
        }
        let perfil: Option<Perfil> = data
            .get("perfil")
            .filter(|p| p.is_object())
            .and_then(|p| serde_json::from_value(p.clone()).ok());
        let permissoes: Vec<Value> = data
            .get("permissoes")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let permissions = permission_names(&permissoes);
        let role = data
            .get("role")
            .and_then(Value::as_str)
            .map(str::to_lowercase)
            .unwrap_or_else(|| normalize_role(perfil.as_ref(), &user));
        let level = data
            .get("level")
            .and_then(Value::as_u64)
            .map(|l| l as u32)
            .or_else(|| perfil.as_ref().and_then(|p| p.nivel_acesso));

        Self {
            user,
            perfil,
            permissoes,
            permissions,
            role,
            level,
        }
    }

    /// Whether the user holds a named permission.
    pub fn has_permission(&self, name: &str) -> bool {
        self.role == "admin" || self.permissions.iter().any(|p| p == name)
    }
}

fn permission_names(permissoes: &[Value]) -> Vec<String> {
    permissoes
        .iter()
        .filter_map(|p| match p {
            Value::String(name) => Some(name.clone()),
            other => other.get("nome").and_then(Value::as_str).map(String::from),
        })
        .collect()
}

/// Derive the role name from the access profile or the user record.
///
/// The profile name wins (`administrador` becomes `admin`), then the access
/// level, then a `role` on the user record, then `usuario`.
pub fn normalize_role(perfil: Option<&Perfil>, user: &Value) -> String {
    if let Some(nome) = perfil.and_then(|p| p.nome.as_deref()).filter(|n| !n.trim().is_empty()) {
        let nome = nome.trim().to_lowercase();
        return match nome.as_str() {
            "administrador" => "admin".to_string(),
            _ => nome,
        };
    }
    if let Some(level) = perfil.and_then(|p| p.nivel_acesso).filter(|l| *l > 0) {
        let role = match level {
            10.. => "admin",
            9 => "gerente",
            6..=8 => "supervisor",
            4..=5 => "operador",
            _ => "cliente",
        };
        return role.to_string();
    }
    if let Some(role) = user.get("role").and_then(Value::as_str) {
        let role = role.to_lowercase();
        return if role.contains("admin") {
            "admin".to_string()
        } else {
            role
        };
    }
    "usuario".to_string()
}

/// Cached access to the current user's profile.
#[derive(Debug, Clone)]
pub struct ProfileCache {
    client: ApiClient,
    cache: Cache<&'static str, Arc<UserProfile>>,
}

impl ProfileCache {
    /// Create a cache using the configured profile TTL.
    pub fn new(client: ApiClient) -> Self {
        let ttl = Duration::from_secs(client.config().cache.profile_ttl_seconds);
        Self::with_ttl(client, ttl)
    }

    /// Create a cache with an explicit TTL.
    pub fn with_ttl(client: ApiClient, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { client, cache }
    }

    /// The current profile, loading it when the cached copy is missing or stale.
    pub async fn get(&self) -> AppResult<Arc<UserProfile>> {
        self.cache
            .try_get_with(PROFILE_KEY, self.load())
            .await
            .map_err(|e: Arc<AppError>| (*e).clone())
    }

    /// Drop the cached copy and load again.
    pub async fn refresh(&self) -> AppResult<Arc<UserProfile>> {
        self.cache.invalidate(PROFILE_KEY).await;
        self.get().await
    }

    /// Drop the cached copy.
    pub async fn clear(&self) {
        self.cache.invalidate(PROFILE_KEY).await;
    }

    async fn load(&self) -> AppResult<Arc<UserProfile>> {
        let request = ApiRequest::get(self.client.config().auth.me_path.clone());
        match self.client.envelope(&request).await {
            Ok(envelope) => {
                let profile = UserProfile::from_payload(&envelope.data);
                self.persist(&profile).await;
                debug!(role = %profile.role, "Loaded user profile");
                Ok(Arc::new(profile))
            }
            Err(err) => match self.persisted().await {
                Some(profile) => {
                    warn!(error = %err, "Profile request failed; using stored copy");
                    Ok(Arc::new(profile))
                }
                None => Err(err),
            },
        }
    }

    async fn persist(&self, profile: &UserProfile) {
        let store = self.client.store();
        let writes = async {
            store.set_json(keys::USER_PROFILE, &profile.user).await?;
            store.set_json(keys::USER_PERFIL, &profile.perfil).await?;
            store.set_json(keys::USER_PERMISSOES, &profile.permissoes).await?;
            store.set_json(keys::USER_PERMISSIONS, &profile.permissions).await?;
            store.set(keys::USER_ROLE, &profile.role).await?;
            if let Some(level) = profile.level {
                store.set(keys::USER_LEVEL, &level.to_string()).await?;
            }
            Ok::<(), AppError>(())
        };
        if let Err(e) = writes.await {
            warn!(error = %e, "Failed to store user profile");
        }
    }

    async fn persisted(&self) -> Option<UserProfile> {
        let store = self.client.store();
        let user: Value = store.get_json(keys::USER_PROFILE).await.ok()??;
        let perfil: Option<Perfil> = store.get_json(keys::USER_PERFIL).await.ok()??;
        let permissoes: Vec<Value> = store.get_json(keys::USER_PERMISSOES).await.ok()??;
        let role = match store.get(keys::USER_ROLE).await.ok().flatten() {
            Some(role) => role,
            None => normalize_role(perfil.as_ref(), &user),
        };
        let level = store
            .get(keys::USER_LEVEL)
            .await
            .ok()
            .flatten()
            .and_then(|l| l.parse().ok())
            .or_else(|| perfil.as_ref().and_then(|p| p.nivel_acesso));
        Some(UserProfile {
            permissions: permission_names(&permissoes),
            user,
            perfil,
            permissoes,
            role,
            level,
        })
    }
}
