//! Token refresh coordination.
//!
//! When requests start failing with authentication errors, exactly one refresh
//! call is made per episode. Callers that fail while it is in flight wait in a
//! FIFO queue and are handed the outcome when it settles: the new access token
//! on success, a copy of the triggering error on failure.
//!
//! Episode lifecycle: `Idle -> Refreshing -> (Draining | Failed) -> Idle`.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info, warn};

use irbana_core::error::AppError;
use irbana_core::result::AppResult;

use crate::interceptor::AuthInterceptor;
use crate::token_store::{Session, TokenStore};

/// Tokens returned by a successful refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// New access token.
    pub access_token: String,
    /// New refresh token, when the server rotates it.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Exchanges a refresh token for a new token pair.
#[async_trait]
pub trait TokenRefresher: Send + Sync + std::fmt::Debug + 'static {
    /// Perform the exchange. Any error fails the episode.
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair>;
}

type Waiter = oneshot::Sender<AppResult<String>>;

#[derive(Debug, Default)]
struct RefreshState {
    refreshing: bool,
    queue: VecDeque<Waiter>,
}

/// Serializes token refreshes and fans the result out to waiting callers.
///
/// Cloning is cheap; clones share the same state.
#[derive(Clone)]
pub struct RefreshCoordinator {
    tokens: TokenStore,
    refresher: Arc<dyn TokenRefresher>,
    interceptor: AuthInterceptor,
    state: Arc<Mutex<RefreshState>>,
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refresher", &self.refresher)
            .finish()
    }
}

impl RefreshCoordinator {
    /// Create a coordinator.
    pub fn new(
        tokens: TokenStore,
        refresher: Arc<dyn TokenRefresher>,
        interceptor: AuthInterceptor,
    ) -> Self {
        Self {
            tokens,
            refresher,
            interceptor,
            state: Arc::new(Mutex::new(RefreshState::default())),
        }
    }

    /// Whether a refresh episode is in flight.
    pub async fn is_refreshing(&self) -> bool {
        self.state.lock().await.refreshing
    }

    /// Number of callers waiting on the current episode.
    pub async fn pending(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    /// Obtain a fresh access token after a request authenticated with
    /// `failed_token` was rejected.
    ///
    /// If the stored token has already moved on, it is returned without a new
    /// refresh. Otherwise the caller joins the current episode, starting one
    /// if none is in flight.
    pub async fn renew(&self, failed_token: Option<&str>) -> AppResult<String> {
        let (tx, rx) = oneshot::channel();
        let start = {
            let mut state = self.state.lock().await;
            if state.refreshing {
                state.queue.push_back(tx);
                debug!(waiting = state.queue.len(), "Refresh in flight; queued caller");
                false
            } else {
                // An episode saves its tokens before it leaves the refreshing
                // state, so this read sees any rotation that already happened.
                if let Some(current) = self.rotated_token(failed_token).await? {
                    debug!("Access token already rotated; skipping refresh");
                    return Ok(current);
                }
                state.queue.push_back(tx);
                state.refreshing = true;
                true
            }
        };

        if start {
            info!("Token refresh started");
            let coordinator = self.clone();
            tokio::spawn(async move { coordinator.run_episode().await });
        }

        rx.await
            .map_err(|_| AppError::internal("Token refresh ended without a result"))?
    }

    /// The stored access token, when it differs from the one that failed.
    async fn rotated_token(&self, failed_token: Option<&str>) -> AppResult<Option<String>> {
        let Some(failed) = failed_token else {
            return Ok(None);
        };
        Ok(self
            .tokens
            .access_token()
            .await?
            .filter(|current| current != failed))
    }

    async fn run_episode(self) {
        match self.exchange().await {
            Ok(access_token) => {
                let waiters = self.finish().await;
                info!(waiters = waiters.len(), "Token refresh succeeded");
                for waiter in waiters {
                    let _ = waiter.send(Ok(access_token.clone()));
                }
            }
            Err(err) => {
                if let Err(e) = self.tokens.clear().await {
                    warn!(error = %e, "Failed to clear tokens after refresh failure");
                }
                let waiters = self.finish().await;
                warn!(error = %err, waiters = waiters.len(), "Token refresh failed");
                for waiter in waiters {
                    let _ = waiter.send(Err(err.clone()));
                }
                self.interceptor.on_refresh_failed(&err).await;
            }
        }
    }

    async fn exchange(&self) -> AppResult<String> {
        let refresh_token = self
            .tokens
            .refresh_token()
            .await?
            .ok_or_else(|| AppError::authentication("No refresh token available"))?;

        let pair = self.refresher.refresh(&refresh_token).await?;
        let session = Session::new(
            pair.access_token.clone(),
            pair.refresh_token.or(Some(refresh_token)),
        );
        self.tokens.save_session(&session).await?;
        Ok(pair.access_token)
    }

    /// Leave the refreshing state and take every queued waiter, in order.
    async fn finish(&self) -> VecDeque<Waiter> {
        let mut state = self.state.lock().await;
        state.refreshing = false;
        std::mem::take(&mut state.queue)
    }
}
