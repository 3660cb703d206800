//! Terminal stand-in for the login redirect.

use async_trait::async_trait;
use tracing::info;

use irbana_auth::Navigator;

use crate::output;

/// Tells the user to sign in again when the session is torn down.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliNavigator;

#[async_trait]
impl Navigator for CliNavigator {
    async fn to_login(&self, entry: &str) {
        info!(entry, "Session ended; login required");
        output::print_warning("Your session has expired. Run `irbana login` to sign in again.");
    }
}
