//! # Algorithms
//!
//! Pure functions behind the transaction history pipeline.

pub mod dedup;
pub mod enrichment;

pub use dedup::{dedup_by_txhash, tag_and_dedup};
pub use enrichment::{apply_block_times, distinct_heights, parse_block_time};
