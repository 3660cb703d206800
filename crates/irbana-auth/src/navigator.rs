//! Login navigation hook.

use async_trait::async_trait;
use tokio::sync::Mutex;

/// Sends the user back to the login entry point after a forced logout.
#[async_trait]
pub trait Navigator: Send + Sync + std::fmt::Debug + 'static {
    /// Navigate to `entry`.
    async fn to_login(&self, entry: &str);
}

/// Navigator that does nothing. Used where no user is around to redirect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

#[async_trait]
impl Navigator for NoopNavigator {
    async fn to_login(&self, _entry: &str) {}
}

/// Navigator that records every navigation.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visits: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries navigated to so far, oldest first.
    pub async fn visits(&self) -> Vec<String> {
        self.visits.lock().await.clone()
    }

    /// Number of navigations so far.
    pub async fn count(&self) -> usize {
        self.visits.lock().await.len()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn to_login(&self, entry: &str) {
        self.visits.lock().await.push(entry.to_string());
    }
}
