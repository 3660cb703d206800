//! # irbana-store
//!
//! Key-value store backends for the IRBANA client session. Supports two modes:
//!
//! - **memory**: process-local map using [dashmap](https://crates.io/crates/dashmap)
//! - **file**: JSON document on disk that survives restarts
//!
//! The backend is selected at runtime based on configuration. The crate also
//! hosts the short-lived [`ReadCache`] used for idempotent GET endpoints.

pub mod file;
pub mod keys;
pub mod manager;
pub mod memory;
pub mod read_cache;

pub use file::FileStore;
pub use manager::StoreManager;
pub use memory::MemoryStore;
pub use read_cache::ReadCache;
