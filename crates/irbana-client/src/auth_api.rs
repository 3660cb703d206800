//! Authentication endpoints: login, logout, current user and token refresh.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info};
use validator::Validate;

use irbana_auth::{Session, TokenPair, TokenRefresher};
use irbana_core::error::{AppError, ErrorKind};
use irbana_core::result::AppResult;
use irbana_core::types::Envelope;

use crate::client::ApiClient;
use crate::dispatcher::Dispatcher;
use crate::request::ApiRequest;

/// Exchanges the refresh token at the refresh endpoint.
///
/// The refresh token travels as the bearer credential with an empty JSON body.
#[derive(Debug, Clone)]
pub struct RefreshExchange {
    dispatcher: Dispatcher,
    path: String,
}

impl RefreshExchange {
    /// Create an exchange against `path` (normally `/auth/refresh`).
    pub fn new(dispatcher: Dispatcher, path: impl Into<String>) -> Self {
        Self {
            dispatcher,
            path: path.into(),
        }
    }
}

#[async_trait]
impl TokenRefresher for RefreshExchange {
    async fn refresh(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let request = ApiRequest::post(self.path.clone())
            .unauthenticated()
            .json_value(json!({}));
        let body = self.dispatcher.dispatch(&request, Some(refresh_token)).await?;
        let envelope = Envelope::normalize(body);
        if !envelope.success {
            return Err(AppError::authentication(
                envelope
                    .message
                    .unwrap_or_else(|| "Token refresh was rejected".to_string()),
            ));
        }
        token_pair(&envelope.data).ok_or_else(|| {
            AppError::authentication("Refresh response did not include an access token")
        })
    }
}

fn token_pair(data: &Value) -> Option<TokenPair> {
    let access_token = data
        .get("access_token")
        .or_else(|| data.pointer("/session/access_token"))
        .and_then(Value::as_str)?
        .to_string();
    let refresh_token = data
        .get("refresh_token")
        .or_else(|| data.pointer("/session/refresh_token"))
        .and_then(Value::as_str)
        .map(String::from);
    Some(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Login credentials.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginRequest {
    /// Account e-mail.
    #[validate(email(message = "must be a valid e-mail address"))]
    pub email: String,
    /// Account password.
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginOutcome {
    /// The authenticated user as returned by the server.
    pub user: Value,
    /// Access profile, when the server sent one.
    #[serde(default)]
    pub profile: Option<Value>,
}

/// Login, logout and current-user calls.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    /// Create the endpoint group.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Authenticate and store the returned tokens.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let credentials = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        credentials.validate()?;

        let request = ApiRequest::post(self.client.config().auth.login_path.clone())
            .unauthenticated()
            .json(&credentials)?;
        let envelope = self.client.envelope(&request).await?;

        let pair = token_pair(&envelope.data).ok_or_else(|| {
            AppError::new(
                ErrorKind::Authentication,
                "Login response did not include an access token",
            )
        })?;
        self.client
            .tokens()
            .save_session(&Session::new(pair.access_token, pair.refresh_token))
            .await?;
        self.client.invalidate_reads();

        info!(email = %credentials.email, "Logged in");
        Ok(LoginOutcome {
            user: envelope.data.get("user").cloned().unwrap_or(Value::Null),
            profile: envelope.data.get("profile").cloned(),
        })
    }

    /// End the session: notify the server when possible, then clear local
    /// state. Never navigates.
    pub async fn logout(&self) -> AppResult<()> {
        if let Some(token) = self.client.tokens().access_token().await? {
            let request = ApiRequest::post(self.client.config().auth.logout_path.clone());
            if let Err(e) = self
                .client
                .dispatcher()
                .dispatch(&request, Some(&token))
                .await
            {
                debug!(error = %e, "Server logout failed; clearing local session anyway");
            }
        }
        self.client.interceptor().clear_local_session().await;
        info!("Logged out");
        Ok(())
    }

    /// Fetch the current user payload (`/auth/me`), uncached.
    pub async fn me(&self) -> AppResult<Value> {
        let request = ApiRequest::get(self.client.config().auth.me_path.clone());
        Ok(self.client.envelope(&request).await?.data)
    }
}
