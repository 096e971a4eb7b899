//! # Deduplication
//!
//! The node may list one transaction twice, e.g. a transfer to self matches
//! both the sender and the recipient query. The first occurrence wins.

use std::collections::HashSet;

use shared_types::{TxCategory, TxRecord};

/// Drop records whose `txhash` was already seen, keeping first-seen order.
pub fn dedup_by_txhash(records: Vec<TxRecord>) -> Vec<TxRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|tx| seen.insert(tx.txhash.clone()))
        .collect()
}

/// Tag every record with `category`, then dedup.
pub fn tag_and_dedup(category: TxCategory, records: Vec<TxRecord>) -> Vec<TxRecord> {
    dedup_by_txhash(records.into_iter().map(|tx| tx.tagged(category)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invariant_unique_hashes;
    use proptest::prelude::*;

    #[test]
    fn test_first_occurrence_wins() {
        let mut first = TxRecord::new("X", 5);
        first.time = Some(1);
        let second = TxRecord::new("X", 5);

        let out = dedup_by_txhash(vec![first.clone(), TxRecord::new("Y", 6), second]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0], first);
        assert_eq!(out[1].txhash, "Y");
    }

    #[test]
    fn test_empty_input() {
        assert!(dedup_by_txhash(Vec::new()).is_empty());
    }

    #[test]
    fn test_tag_overwrites_existing_tag() {
        let out = tag_and_dedup(
            TxCategory::Governance,
            vec![TxRecord::new("A", 1).tagged(TxCategory::Wallet)],
        );
        assert_eq!(out[0].category, Some(TxCategory::Governance));
    }

    proptest! {
        #[test]
        fn prop_dedup_is_unique_and_ordered(hashes in prop::collection::vec("[a-e]", 0..40)) {
            let records: Vec<TxRecord> = hashes
                .iter()
                .enumerate()
                .map(|(i, h)| TxRecord::new(h.clone(), i as u64))
                .collect();
            let out = dedup_by_txhash(records);

            prop_assert!(invariant_unique_hashes(&out));

            let mut expected: Vec<String> = Vec::new();
            for h in &hashes {
                if !expected.contains(h) {
                    expected.push(h.clone());
                }
            }
            let got: Vec<String> = out.iter().map(|tx| tx.txhash.clone()).collect();
            prop_assert_eq!(got, expected);

            // first occurrence carries the lowest height
            for tx in &out {
                let first = hashes.iter().position(|h| *h == tx.txhash).unwrap() as u64;
                prop_assert_eq!(tx.height, first);
            }
        }
    }
}
