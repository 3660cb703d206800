//! File upload configuration.

use serde::{Deserialize, Serialize};

/// File upload configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Public URL of the storage backend, used to build absolute file URLs
    /// when the upload API answers with a bare relative path.
    #[serde(default)]
    pub storage_public_url: Option<String>,
    /// Storage bucket holding uploaded files.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Multipart field name of the file payload.
    #[serde(default = "default_file_field")]
    pub file_field: String,
    /// Maximum accepted file size in megabytes.
    #[serde(default = "default_max_size")]
    pub max_size_mb: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            storage_public_url: None,
            bucket: default_bucket(),
            file_field: default_file_field(),
            max_size_mb: default_max_size(),
        }
    }
}

fn default_bucket() -> String {
    "arquivos-obras".to_string()
}

fn default_file_field() -> String {
    "arquivo".to_string()
}

fn default_max_size() -> u64 {
    10
}
