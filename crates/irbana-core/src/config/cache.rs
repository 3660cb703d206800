//! Read cache configuration.

use serde::{Deserialize, Serialize};

/// Client-side cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL of cached read responses in seconds.
    #[serde(default = "default_read_ttl")]
    pub read_ttl_seconds: u64,
    /// Maximum number of cached read responses.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
    /// TTL of the cached current-user profile in seconds.
    #[serde(default = "default_profile_ttl")]
    pub profile_ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            read_ttl_seconds: default_read_ttl(),
            max_capacity: default_max_capacity(),
            profile_ttl_seconds: default_profile_ttl(),
        }
    }
}

fn default_read_ttl() -> u64 {
    5
}

fn default_max_capacity() -> u64 {
    1000
}

fn default_profile_ttl() -> u64 {
    300
}
