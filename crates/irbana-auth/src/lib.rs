//! # irbana-auth
//!
//! Client-side session handling for IRBANA:
//!
//! - [`TokenStore`]: access/refresh tokens in the persistent key-value store
//! - [`RefreshCoordinator`]: one token refresh per failure storm, with queued
//!   callers replayed once it settles
//! - [`AuthInterceptor`]: auth failure classification and session teardown
//! - [`Navigator`]: where the user is sent when the session cannot be saved

pub mod interceptor;
pub mod navigator;
pub mod refresh;
pub mod token_store;

pub use interceptor::{AuthClassifier, AuthInterceptor, TeardownOutcome};
pub use navigator::{Navigator, NoopNavigator, RecordingNavigator};
pub use refresh::{RefreshCoordinator, TokenPair, TokenRefresher};
pub use token_store::{Session, TokenStore};
