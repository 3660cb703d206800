//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Default page size.
const DEFAULT_LIMIT: u64 = 20;
/// Maximum page size accepted by the backend.
const MAX_LIMIT: u64 = 100;

/// Page selection sent as `page`/`limit` query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

impl PageQuery {
    /// Create a new page query, clamped to the accepted range.
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Query pairs for the request URL.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ]
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Pagination block returned by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-based).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Items per page.
    #[serde(default = "default_limit", alias = "per_page", alias = "page_size")]
    pub limit: u64,
    /// Total number of items across all pages.
    #[serde(default, alias = "total_items", alias = "count")]
    pub total: u64,
    /// Total number of pages.
    #[serde(default, alias = "total_pages", alias = "totalPages")]
    pub pages: u64,
}

impl Pagination {
    /// Parse a pagination block, tolerating missing fields.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let mut parsed: Self = serde_json::from_value(value.clone()).ok()?;
        if parsed.pages == 0 && parsed.total > 0 && parsed.limit > 0 {
            parsed.pages = parsed.total.div_ceil(parsed.limit);
        }
        Some(parsed)
    }

    /// Whether there is a next page.
    pub fn has_next(&self) -> bool {
        self.page < self.pages
    }

    /// Whether there is a previous page.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}
