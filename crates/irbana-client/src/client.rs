//! The authenticated API client.
//!
//! [`ApiClient`] wires the dispatcher to the token store, the refresh
//! coordinator and the auth interceptor:
//!
//! 1. Attach the stored access token and send.
//! 2. On a 401 (or a 403 recognised as an authentication failure), obtain a
//!    renewed token from the coordinator and replay the request once.
//! 3. On a transport failure with no stored session, tear the session down.
//!
//! Selected reads go through a short-lived cache that also coalesces
//! concurrent identical calls.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use irbana_auth::{
    AuthInterceptor, Navigator, NoopNavigator, RefreshCoordinator, TokenRefresher, TokenStore,
};
use irbana_core::config::AppConfig;
use irbana_core::result::AppResult;
use irbana_core::types::Envelope;
use irbana_store::keys::read_cache_key;
use irbana_store::{ReadCache, StoreManager};

use crate::auth_api::RefreshExchange;
use crate::dispatcher::Dispatcher;
use crate::request::ApiRequest;
use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Authenticated client for the IRBANA API.
///
/// Cloning is cheap; clones share tokens, refresh state and caches.
#[derive(Debug, Clone)]
pub struct ApiClient {
    dispatcher: Dispatcher,
    tokens: TokenStore,
    coordinator: RefreshCoordinator,
    interceptor: AuthInterceptor,
    read_cache: ReadCache,
    retry: RetryPolicy,
    config: Arc<AppConfig>,
}

impl ApiClient {
    /// Start building a client from configuration.
    pub fn builder(config: AppConfig) -> ClientBuilder {
        ClientBuilder::new(config)
    }

    /// Build a client with the production transport and the configured store.
    pub async fn from_config(config: AppConfig, navigator: Arc<dyn Navigator>) -> AppResult<Self> {
        Self::builder(config).navigator(navigator).build().await
    }

    /// Configuration the client was built with.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Token store.
    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Key-value store holding the session and cached profile.
    pub fn store(&self) -> &StoreManager {
        self.tokens.store()
    }

    /// Auth interceptor.
    pub fn interceptor(&self) -> &AuthInterceptor {
        &self.interceptor
    }

    /// Refresh coordinator.
    pub fn coordinator(&self) -> &RefreshCoordinator {
        &self.coordinator
    }

    /// Request dispatcher.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Server origin without the `/api` suffix.
    pub fn origin(&self) -> String {
        self.config.api.origin()
    }

    /// Whether an access token is stored.
    pub async fn is_authenticated(&self) -> AppResult<bool> {
        self.tokens.is_authenticated().await
    }

    /// Drop every cached read.
    pub fn invalidate_reads(&self) {
        self.read_cache.invalidate_all();
    }

    /// Execute a request and return the raw JSON body.
    pub async fn execute(&self, request: &ApiRequest) -> AppResult<Value> {
        if request.cacheable && request.is_read() {
            let url = self.dispatcher.url_for(request)?;
            let options = request
                .headers
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&");
            let key = read_cache_key(request.method.as_str(), &url, &options);
            return self.read_cache.get_or_load(key, || self.send(request)).await;
        }

        let result = self.send(request).await;
        if result.is_ok() && !request.is_read() {
            self.read_cache.invalidate_all();
        }
        result
    }

    /// Execute a request and normalize the response envelope.
    pub async fn envelope(&self, request: &ApiRequest) -> AppResult<Envelope<Value>> {
        let body = self.execute(request).await?;
        Envelope::normalize(body).into_result()
    }

    /// Execute a request and decode the envelope payload.
    pub async fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest) -> AppResult<Envelope<T>> {
        self.envelope(request).await?.decode()
    }

    /// Execute a request and decode only the payload.
    pub async fn fetch_data<T: DeserializeOwned>(&self, request: &ApiRequest) -> AppResult<T> {
        Ok(self.fetch(request).await?.data)
    }

    async fn send(&self, request: &ApiRequest) -> AppResult<Value> {
        self.retry.run(move || self.attempt(request)).await
    }

    async fn attempt(&self, request: &ApiRequest) -> AppResult<Value> {
        let token = if request.authenticated {
            self.tokens.access_token().await?
        } else {
            None
        };

        let err = match self.dispatcher.dispatch(request, token.as_deref()).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if request.authenticated && self.interceptor.should_renew(&request.path, &err) {
            warn!(
                path = %request.path,
                status = err.status.unwrap_or_default(),
                "Authentication failure; renewing session"
            );
            let fresh = self.coordinator.renew(token.as_deref()).await?;
            debug!(path = %request.path, "Replaying request with renewed token");
            return match self.dispatcher.dispatch(request, Some(&fresh)).await {
                Ok(value) => Ok(value),
                Err(retry_err) => {
                    if self.interceptor.is_auth_failure(&request.path, &retry_err) {
                        warn!(path = %request.path, "Request rejected again after token refresh");
                        self.interceptor
                            .teardown("request rejected after token refresh")
                            .await;
                    }
                    Err(retry_err)
                }
            };
        }

        if request.authenticated && err.is_transport() {
            self.interceptor.on_network_error(&err).await;
        }
        Err(err)
    }
}

/// Assembles an [`ApiClient`], allowing any collaborator to be replaced.
pub struct ClientBuilder {
    config: AppConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    store: Option<StoreManager>,
    navigator: Option<Arc<dyn Navigator>>,
    refresher: Option<Arc<dyn TokenRefresher>>,
}

impl ClientBuilder {
    /// Start from configuration; every collaborator defaults from it.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            transport: None,
            store: None,
            navigator: None,
            refresher: None,
        }
    }

    /// Use a specific HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a specific key-value store.
    pub fn store(mut self, store: StoreManager) -> Self {
        self.store = Some(store);
        self
    }

    /// Use a specific login navigator.
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Use a specific token refresher instead of the refresh endpoint.
    pub fn refresher(mut self, refresher: Arc<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Build the client.
    pub async fn build(self) -> AppResult<ApiClient> {
        let config = self.config;
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&config.api)?),
        };
        let store = match self.store {
            Some(store) => store,
            None => StoreManager::new(&config.store).await?,
        };
        let navigator = self.navigator.unwrap_or_else(|| Arc::new(NoopNavigator));

        let dispatcher = Dispatcher::new(transport, config.api.api_root());
        let tokens = TokenStore::new(store);
        let read_cache = ReadCache::new(&config.cache);
        let interceptor = AuthInterceptor::new(&config.auth, tokens.clone(), navigator)
            .on_session_cleared({
                let read_cache = read_cache.clone();
                move || read_cache.invalidate_all()
            });
        let refresher = self.refresher.unwrap_or_else(|| {
            Arc::new(RefreshExchange::new(
                dispatcher.clone(),
                config.auth.refresh_path.clone(),
            ))
        });
        let coordinator = RefreshCoordinator::new(tokens.clone(), refresher, interceptor.clone());

        Ok(ApiClient {
            read_cache,
            retry: RetryPolicy::new(&config.retry),
            dispatcher,
            tokens,
            coordinator,
            interceptor,
            config: Arc::new(config),
        })
    }
}
