//! # Transaction History Configuration

use serde::{Deserialize, Serialize};

/// Transaction history configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TxHistoryConfig {
    /// Block metadata entries kept by the LRU cache.
    pub block_cache_size: usize,

    /// Upper bound on concurrent block lookups during enrichment.
    /// 0 means one in-flight lookup per distinct height.
    pub max_concurrent_lookups: usize,

    /// Publish an error notification on failed fetches.
    pub notify_on_error: bool,
}

impl Default for TxHistoryConfig {
    fn default() -> Self {
        Self {
            block_cache_size: 1000,
            max_concurrent_lookups: 0,
            notify_on_error: true,
        }
    }
}

impl TxHistoryConfig {
    /// Create a config for testing (smaller values).
    pub fn for_testing() -> Self {
        Self {
            block_cache_size: 16,
            max_concurrent_lookups: 0,
            notify_on_error: true,
        }
    }
}
