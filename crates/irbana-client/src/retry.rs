//! Opt-in retry policy for transient failures.
//!
//! Retries are off unless `retry.enabled` is set. Rate-limited responses are
//! never retried: retrying them only prolongs the lockout.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use irbana_core::config::retry::RetryConfig;
use irbana_core::error::{AppError, ErrorKind};
use irbana_core::result::AppResult;

/// Exponential backoff retry for network errors and 5xx responses.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    enabled: bool,
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    /// Build from configuration.
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            enabled: config.enabled,
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.base_delay_ms),
        }
    }

    /// A policy that never retries.
    pub fn disabled() -> Self {
        Self::new(&RetryConfig::default())
    }

    /// Whether retries are enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether `error` is worth another attempt.
    pub fn is_retryable(error: &AppError) -> bool {
        match error.kind {
            ErrorKind::Network | ErrorKind::Timeout => true,
            ErrorKind::Server | ErrorKind::ServiceUnavailable => true,
            _ => false,
        }
    }

    /// Delay before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }

    /// Run `op`, retrying transient failures when enabled.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> AppResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err)
                    if self.enabled && attempt < self.max_retries && Self::is_retryable(&err) =>
                {
                    attempt += 1;
                    let delay = self.delay_for(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retrying request"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}
