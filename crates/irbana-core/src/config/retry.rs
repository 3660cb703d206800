//! Retry helper configuration.

use serde::{Deserialize, Serialize};

/// Configuration of the generic retry helper.
///
/// Disabled by default: retrying under rate limiting compounds the problem,
/// so every call runs exactly once unless an operator opts in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Whether automatic retries are enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Maximum retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds; doubled on each retry.
    #[serde(default = "default_base_delay")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_retries: default_max_retries(),
            base_delay_ms: default_base_delay(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_base_delay() -> u64 {
    500
}
