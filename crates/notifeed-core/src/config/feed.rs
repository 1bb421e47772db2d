//! Feed read-path configuration.

use serde::{Deserialize, Serialize};

/// Feed pagination and caching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedTuning {
    /// TTL in seconds for cached feed pages and counts.
    #[serde(default = "default_page_ttl")]
    pub page_ttl_seconds: u64,
    /// Page size used when the caller does not pass a limit.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Hard upper bound on the page size a caller may request.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl Default for FeedTuning {
    fn default() -> Self {
        Self {
            page_ttl_seconds: default_page_ttl(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_page_ttl() -> u64 {
    300
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}
