//! # WC-01 Transaction History
//!
//! Fetches a wallet's transaction history, files it under three categories
//! and back-fills block times.
//!
//! **Module ID:** 01
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Pipeline
//!
//! 1. Fetch staking, governance and wallet transactions for the session address
//! 2. Tag each record with its category, dedup each category by `txhash`
//! 3. Collect the distinct block heights across all three lists
//! 4. Look up block metadata once per height, concurrently, fail-fast
//! 5. Write the block time (epoch ms) onto every record at that height
//!
//! ## Module Structure
//!
//! ```text
//! wc-01-transaction-history/
//! ├── domain/          # TxHistoryState, errors, invariants
//! ├── algorithms/      # dedup, height collection, time enrichment
//! ├── ports/           # API trait (inbound) + node traits (outbound)
//! ├── adapters/        # LRU block metadata cache
//! ├── application/     # TransactionHistoryService
//! └── config.rs        # TxHistoryConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::CachedBlockSource;
pub use algorithms::{
    apply_block_times, dedup_by_txhash, distinct_heights, parse_block_time, tag_and_dedup,
};
pub use application::TransactionHistoryService;
pub use config::TxHistoryConfig;
pub use domain::{
    invariant_heights_cover, invariant_tagged, invariant_unique_hashes, EnrichmentSummary, TxCounts,
    TxFetchOutcome, TxHistoryError, TxHistoryState, ERROR_TITLE, MODULE_NAME,
};
pub use ports::{BlockInfoSource, MockNode, TransactionHistoryApi, TxSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
