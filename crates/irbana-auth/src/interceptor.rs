//! Authentication failure classification and session teardown.
//!
//! The interceptor decides whether a failed request means "the session is
//! gone" and, when a session cannot be recovered, clears every credential and
//! cached profile key and sends the user back to the login entry point.
//! Teardowns are debounced so a burst of failures produces one navigation,
//! and a loop guard stops redirecting if teardowns keep happening.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use irbana_core::config::auth::AuthConfig;
use irbana_core::error::AppError;
use irbana_core::traits::store::KeyValueStore;
use irbana_store::keys;

use crate::navigator::Navigator;
use crate::token_store::TokenStore;

/// Decides which errors are authentication failures.
#[derive(Debug, Clone)]
pub struct AuthClassifier {
    excluded_paths: Vec<String>,
    phrases: Vec<String>,
    codes: Vec<String>,
}

impl AuthClassifier {
    /// Build a classifier from configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            excluded_paths: config.excluded_paths.clone(),
            phrases: config.auth_phrases.iter().map(|p| p.to_lowercase()).collect(),
            codes: config.auth_error_codes.clone(),
        }
    }

    /// Whether `path` is a login/refresh endpoint that must never trigger a refresh.
    pub fn is_excluded(&self, path: &str) -> bool {
        let path = path.split('?').next().unwrap_or(path);
        self.excluded_paths.iter().any(|p| path.contains(p.as_str()))
    }

    /// Whether `error`, returned by a request to `path`, is an authentication failure.
    ///
    /// The status must be 401 or 403 and the path must not be excluded. A
    /// recognised machine-readable code settles it; otherwise a server message
    /// must contain one of the recognised phrases. Errors without a server
    /// message are judged by status alone.
    pub fn is_auth_failure(&self, path: &str, error: &AppError) -> bool {
        if !error.is_auth_status() || self.is_excluded(path) {
            return false;
        }
        if let Some(code) = error.code.as_deref() {
            if self.codes.iter().any(|c| c.eq_ignore_ascii_case(code)) {
                return true;
            }
        }
        match error.server_message() {
            Some(message) => {
                let message = message.to_lowercase();
                self.phrases.iter().any(|p| message.contains(p.as_str()))
            }
            None => true,
        }
    }

    /// Whether a rejection of a request to `path` should start a token renewal.
    ///
    /// Any 401 outside the excluded endpoints renews. A 403 renews only when
    /// it is recognised as an authentication failure, so permission errors
    /// reach the caller untouched.
    pub fn should_renew(&self, path: &str, error: &AppError) -> bool {
        match error.status {
            Some(401) => !self.is_excluded(path),
            Some(403) => self.is_auth_failure(path, error),
            _ => false,
        }
    }
}

/// What a teardown request ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// Session cleared and the user was sent to login.
    Navigated,
    /// Ignored: another teardown happened moments ago.
    Debounced,
    /// Session cleared but navigation skipped because teardowns are looping.
    Suppressed,
}

type SessionHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Default)]
struct TeardownState {
    last: Option<Instant>,
    recent: VecDeque<Instant>,
}

/// Classifies failures and tears the session down when it cannot be renewed.
#[derive(Clone)]
pub struct AuthInterceptor {
    classifier: AuthClassifier,
    tokens: TokenStore,
    navigator: Arc<dyn Navigator>,
    login_entry: String,
    debounce: Duration,
    loop_window: Duration,
    max_in_window: usize,
    hooks: Vec<SessionHook>,
    state: Arc<Mutex<TeardownState>>,
}

impl std::fmt::Debug for AuthInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthInterceptor")
            .field("classifier", &self.classifier)
            .field("login_entry", &self.login_entry)
            .field("debounce", &self.debounce)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

impl AuthInterceptor {
    /// Create an interceptor.
    pub fn new(config: &AuthConfig, tokens: TokenStore, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            classifier: AuthClassifier::new(config),
            tokens,
            navigator,
            login_entry: config.login_entry.clone(),
            debounce: Duration::from_millis(config.teardown_debounce_ms),
            loop_window: Duration::from_secs(config.loop_window_seconds),
            max_in_window: config.max_teardowns_in_window as usize,
            hooks: Vec::new(),
            state: Arc::new(Mutex::new(TeardownState::default())),
        }
    }

    /// Run `hook` whenever the local session is cleared.
    pub fn on_session_cleared(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// The failure classifier.
    pub fn classifier(&self) -> &AuthClassifier {
        &self.classifier
    }

    /// Shorthand for [`AuthClassifier::is_auth_failure`].
    pub fn is_auth_failure(&self, path: &str, error: &AppError) -> bool {
        self.classifier.is_auth_failure(path, error)
    }

    /// Shorthand for [`AuthClassifier::should_renew`].
    pub fn should_renew(&self, path: &str, error: &AppError) -> bool {
        self.classifier.should_renew(path, error)
    }

    /// React to a transport error. Without a stored token there is no session
    /// to keep, so the user is sent to login.
    pub async fn on_network_error(&self, error: &AppError) -> Option<TeardownOutcome> {
        match self.tokens.access_token().await {
            Ok(Some(_)) => None,
            Ok(None) => {
                warn!(error = %error, "Request failed without a stored session");
                Some(self.teardown("network error without session").await)
            }
            Err(e) => {
                warn!(error = %e, "Could not read the token store");
                None
            }
        }
    }

    /// React to a refresh episode that could not renew the session.
    pub async fn on_refresh_failed(&self, error: &AppError) -> TeardownOutcome {
        self.teardown(&error.message).await
    }

    /// Clear the session and navigate to login, subject to debounce and the
    /// loop guard.
    pub async fn teardown(&self, reason: &str) -> TeardownOutcome {
        let now = Instant::now();
        let looping = {
            let mut state = self.state.lock().await;
            if let Some(last) = state.last {
                if now.duration_since(last) < self.debounce {
                    debug!(reason, "Session teardown debounced");
                    return TeardownOutcome::Debounced;
                }
            }
            state.last = Some(now);
            let window = self.loop_window;
            state.recent.retain(|at| now.duration_since(*at) <= window);
            state.recent.push_back(now);
            state.recent.len() > self.max_in_window
        };

        self.clear_local_session().await;

        if looping {
            error!(
                reason,
                window_seconds = self.loop_window.as_secs(),
                "Repeated session teardowns detected; not redirecting to login"
            );
            return TeardownOutcome::Suppressed;
        }

        info!(reason, entry = %self.login_entry, "Session ended; redirecting to login");
        self.navigator.to_login(&self.login_entry).await;
        TeardownOutcome::Navigated
    }

    /// Remove tokens and every cached profile key, then run the session
    /// hooks. Failures are logged only.
    pub async fn clear_local_session(&self) {
        if let Err(e) = self.tokens.clear().await {
            warn!(error = %e, "Failed to clear session tokens");
        }
        if let Err(e) = self.tokens.store().remove_many(keys::PROFILE_KEYS).await {
            warn!(error = %e, "Failed to clear cached profile");
        }
        for hook in &self.hooks {
            hook();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use irbana_store::StoreManager;

    use super::*;
    use crate::navigator::RecordingNavigator;

    fn setup() -> (AuthInterceptor, TokenStore, Arc<RecordingNavigator>) {
        let tokens = TokenStore::new(StoreManager::in_memory());
        let navigator = Arc::new(RecordingNavigator::new());
        let interceptor =
            AuthInterceptor::new(&AuthConfig::default(), tokens.clone(), navigator.clone());
        (interceptor, tokens, navigator)
    }

    fn with_message(status: u16, message: &str) -> AppError {
        AppError::http(status, message).with_body(json!({"success": false, "message": message}))
    }

    #[test]
    fn test_classifies_expired_token() {
        let classifier = AuthClassifier::new(&AuthConfig::default());
        assert!(classifier.is_auth_failure("/funcionarios", &with_message(401, "Token expirado")));
        assert!(classifier.is_auth_failure("/obras", &with_message(403, "Invalid token")));
    }

    #[test]
    fn test_permission_denied_is_not_auth_failure() {
        let classifier = AuthClassifier::new(&AuthConfig::default());
        let err = with_message(403, "Permissão insuficiente para esta operação");
        assert!(!classifier.is_auth_failure("/funcionarios", &err));
    }

    #[test]
    fn test_error_code_wins_over_message() {
        let classifier = AuthClassifier::new(&AuthConfig::default());
        let err = with_message(401, "Sessão inválida").with_code("TOKEN_EXPIRED");
        assert!(classifier.is_auth_failure("/gruas", &err));
    }

    #[test]
    fn test_status_alone_without_message() {
        let classifier = AuthClassifier::new(&AuthConfig::default());
        let err = AppError::http(401, "Request failed with status 401");
        assert!(classifier.is_auth_failure("/clientes", &err));
        assert!(!classifier.is_auth_failure("/clientes", &AppError::http(500, "boom")));
    }

    #[test]
    fn test_auth_endpoints_are_excluded() {
        let classifier = AuthClassifier::new(&AuthConfig::default());
        let err = with_message(401, "Token expirado");
        assert!(!classifier.is_auth_failure("/auth/login", &err));
        assert!(!classifier.is_auth_failure("/auth/refresh?x=1", &err));
    }

    #[test]
    fn test_any_401_renews() {
        let classifier = AuthClassifier::new(&AuthConfig::default());
        let err = AppError::http(401, "Você precisa estar logado para acessar este recurso")
            .with_body(json!({
                "error": "Não autenticado",
                "message": "Você precisa estar logado para acessar este recurso"
            }));
        assert!(!classifier.is_auth_failure("/gruas", &err));
        assert!(classifier.should_renew("/gruas", &err));
        assert!(!classifier.should_renew("/auth/login", &err));
    }

    #[test]
    fn test_403_renews_only_when_recognised() {
        let classifier = AuthClassifier::new(&AuthConfig::default());
        assert!(classifier.should_renew("/obras", &with_message(403, "Token inválido")));
        assert!(!classifier.should_renew("/obras", &with_message(403, "Permissão insuficiente")));
        assert!(!classifier.should_renew("/obras", &AppError::http(500, "boom")));
    }

    #[tokio::test]
    async fn test_teardown_runs_session_hooks() {
        let tokens = TokenStore::new(StoreManager::in_memory());
        let navigator = Arc::new(RecordingNavigator::new());
        let cleared = Arc::new(AtomicUsize::new(0));
        let interceptor = AuthInterceptor::new(&AuthConfig::default(), tokens, navigator)
            .on_session_cleared({
                let cleared = cleared.clone();
                move || {
                    cleared.fetch_add(1, Ordering::SeqCst);
                }
            });

        interceptor.teardown("expired").await;
        assert_eq!(cleared.load(Ordering::SeqCst), 1);
        interceptor.clear_local_session().await;
        assert_eq!(cleared.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_teardowns_navigate_once() {
        let (interceptor, tokens, navigator) = setup();
        tokens.set_access_token("t").await.unwrap();

        assert_eq!(interceptor.teardown("first").await, TeardownOutcome::Navigated);
        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(interceptor.teardown("second").await, TeardownOutcome::Debounced);

        assert_eq!(navigator.count().await, 1);
        assert_eq!(navigator.visits().await, vec!["/".to_string()]);
        assert!(tokens.access_token().await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_after_debounce_navigates_again() {
        let (interceptor, _tokens, navigator) = setup();
        interceptor.teardown("first").await;
        tokio::time::advance(Duration::from_millis(2100)).await;
        assert_eq!(interceptor.teardown("second").await, TeardownOutcome::Navigated);
        assert_eq!(navigator.count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_guard_stops_navigation() {
        let tokens = TokenStore::new(StoreManager::in_memory());
        let navigator = Arc::new(RecordingNavigator::new());
        let config = AuthConfig {
            teardown_debounce_ms: 100,
            ..AuthConfig::default()
        };
        let interceptor = AuthInterceptor::new(&config, tokens, navigator.clone());

        let mut outcomes = Vec::new();
        for _ in 0..5 {
            outcomes.push(interceptor.teardown("loop").await);
            tokio::time::advance(Duration::from_millis(500)).await;
        }
        assert_eq!(&outcomes[..3], &[TeardownOutcome::Navigated; 3]);
        assert_eq!(outcomes[3], TeardownOutcome::Suppressed);
        assert_eq!(navigator.count().await, 3);
    }

    #[tokio::test]
    async fn test_teardown_clears_profile_keys() {
        let (interceptor, tokens, _navigator) = setup();
        let store = tokens.store().clone();
        store.set(keys::USER_PROFILE, "{}").await.unwrap();
        store.set(keys::USER_ROLE, "admin").await.unwrap();
        store.set("theme", "dark").await.unwrap();

        interceptor.teardown("test").await;

        assert!(store.get(keys::USER_PROFILE).await.unwrap().is_none());
        assert!(store.get(keys::USER_ROLE).await.unwrap().is_none());
        assert_eq!(store.get("theme").await.unwrap(), Some("dark".to_string()));
    }

    #[tokio::test]
    async fn test_network_error_without_token_tears_down() {
        let (interceptor, tokens, navigator) = setup();
        let err = AppError::network("connection refused");

        tokens.set_access_token("t").await.unwrap();
        assert_eq!(interceptor.on_network_error(&err).await, None);

        tokens.clear().await.unwrap();
        assert_eq!(
            interceptor.on_network_error(&err).await,
            Some(TeardownOutcome::Navigated)
        );
        assert_eq!(navigator.count().await, 1);
    }
}
