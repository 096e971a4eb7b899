//! # Domain Invariants
//!
//! Checks that must hold on committed transaction history state.

use std::collections::{HashMap, HashSet};

use shared_types::{Height, TxCategory, TxRecord};

use super::entities::TxHistoryState;

/// No two records in one category share a `txhash`.
pub fn invariant_unique_hashes(records: &[TxRecord]) -> bool {
    let mut seen = HashSet::with_capacity(records.len());
    records.iter().all(|tx| seen.insert(tx.txhash.as_str()))
}

/// Every record carries the tag of the category it is filed under.
pub fn invariant_tagged(state: &TxHistoryState) -> bool {
    TxCategory::ALL.iter().all(|c| {
        state
            .category(*c)
            .iter()
            .all(|tx| tx.category == Some(*c))
    })
}

/// Every record at a height in `resolved` has the time of that height.
pub fn invariant_heights_cover(
    state: &TxHistoryState,
    resolved: &HashMap<Height, i64>,
) -> bool {
    state
        .all_transactions()
        .iter()
        .filter_map(|tx| resolved.get(&tx.height).map(|t| (tx.time, *t)))
        .all(|(have, want)| have == Some(want))
}
