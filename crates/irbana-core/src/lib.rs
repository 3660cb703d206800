//! # irbana-core
//!
//! Core crate for the IRBANA back-office client. Contains the unified error
//! system, configuration schemas, the response envelope and pagination types
//! shared by every resource client, and the key-value store trait that the
//! token store is built on.
//!
//! This crate has **no** internal dependencies on other IRBANA crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
