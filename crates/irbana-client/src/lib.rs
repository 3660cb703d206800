//! Authenticated HTTP client for the IRBANA back-office API.
//!
//! [`ApiClient`] sends every call through the dispatcher with the stored
//! bearer token, renews the session through the refresh coordinator on an
//! authentication failure and replays the call once. The resource clients in
//! [`resources`] wrap it with typed request and response shapes.

pub mod auth_api;
pub mod client;
pub mod dispatcher;
pub mod profile;
pub mod rate_limit;
pub mod request;
pub mod resources;
pub mod retry;
pub mod transport;
pub mod upload;

pub use auth_api::{AuthApi, LoginOutcome, RefreshExchange};
pub use client::{ApiClient, ClientBuilder};
pub use dispatcher::Dispatcher;
pub use profile::{ProfileCache, UserProfile};
pub use request::{ApiRequest, MultipartForm, RequestBody};
pub use resources::Page;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use upload::{UploadMetadata, UploadedFile, Uploader};
