//! # Block Time Enrichment
//!
//! Transactions come back without a time. Each distinct height is looked up
//! once and the block time is written onto every record at that height, in
//! every category.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use shared_types::{BlockMeta, Height, TxCategory, TxRecord};

use crate::domain::{TxHistoryError, TxHistoryState};

/// Distinct heights of `records`, in first-seen order.
pub fn distinct_heights(records: &[TxRecord]) -> Vec<Height> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|tx| tx.height)
        .filter(|h| seen.insert(*h))
        .collect()
}

/// Block time of `meta` as milliseconds since the Unix epoch.
///
/// Accepts RFC 3339, ISO 8601 with a `+hhmm` offset, and offset-less
/// timestamps, which are read as UTC. Sub-millisecond precision is
/// truncated.
pub fn parse_block_time(height: Height, meta: &BlockMeta) -> Result<i64, TxHistoryError> {
    let raw = meta.header.time.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|t| t.timestamp_millis())
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|naive| Utc.from_utc_datetime(&naive).timestamp_millis())
        })
        .map_err(|_| TxHistoryError::InvalidBlockTime {
            height,
            time: meta.header.time.clone(),
        })
}

/// Write resolved times onto every matching record in `state`.
///
/// Returns the number of records written.
pub fn apply_block_times(state: &mut TxHistoryState, times: &HashMap<Height, i64>) -> usize {
    let mut updated = 0;
    for category in TxCategory::ALL {
        for tx in state.category_mut(category) {
            if let Some(time) = times.get(&tx.height) {
                tx.time = Some(*time);
                updated += 1;
            }
        }
    }
    updated
}
