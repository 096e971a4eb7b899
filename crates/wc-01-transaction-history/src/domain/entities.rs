//! # Domain Entities
//!
//! The transaction history state as exposed to the view layer.

use shared_types::{Height, TxCategory, TxRecord};

use super::errors::TxHistoryError;

/// Transaction history state.
///
/// `loading` is raised at the start of every fetch and only lowered by a
/// successful one, so a fetch cut short by a disconnect or an error is
/// retried on reconnect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TxHistoryState {
    /// A fetch was started and has not completed successfully.
    pub loading: bool,
    /// At least one fetch completed successfully.
    pub loaded: bool,
    /// Error of the last failed fetch, cleared on success.
    pub error: Option<TxHistoryError>,
    /// Transactions sent from or to the wallet.
    pub wallet: Vec<TxRecord>,
    /// Delegation transactions.
    pub staking: Vec<TxRecord>,
    /// Proposal, deposit and vote transactions.
    pub governance: Vec<TxRecord>,
}

impl TxHistoryState {
    /// Records filed under `category`.
    pub fn category(&self, category: TxCategory) -> &[TxRecord] {
        match category {
            TxCategory::Staking => &self.staking,
            TxCategory::Governance => &self.governance,
            TxCategory::Wallet => &self.wallet,
        }
    }

    /// Mutable access to the records filed under `category`.
    pub fn category_mut(&mut self, category: TxCategory) -> &mut Vec<TxRecord> {
        match category {
            TxCategory::Staking => &mut self.staking,
            TxCategory::Governance => &mut self.governance,
            TxCategory::Wallet => &mut self.wallet,
        }
    }

    /// Every record, staking first, then governance, then wallet.
    pub fn all_transactions(&self) -> Vec<TxRecord> {
        TxCategory::ALL
            .iter()
            .flat_map(|c| self.category(*c).iter().cloned())
            .collect()
    }

    /// Look up a record by hash across all categories.
    pub fn find(&self, txhash: &str) -> Option<&TxRecord> {
        TxCategory::ALL
            .iter()
            .flat_map(|c| self.category(*c).iter())
            .find(|tx| tx.txhash == txhash)
    }

    /// Heights of records that have no time yet.
    pub fn untimed_heights(&self) -> Vec<Height> {
        let mut heights: Vec<Height> = TxCategory::ALL
            .iter()
            .flat_map(|c| self.category(*c).iter())
            .filter(|tx| tx.time.is_none())
            .map(|tx| tx.height)
            .collect();
        heights.sort_unstable();
        heights.dedup();
        heights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TxHistoryState {
        TxHistoryState {
            staking: vec![TxRecord::new("A", 1).tagged(TxCategory::Staking)],
            governance: vec![TxRecord::new("B", 2).tagged(TxCategory::Governance)],
            wallet: vec![TxRecord::new("C", 1).tagged(TxCategory::Wallet)],
            ..Default::default()
        }
    }

    #[test]
    fn test_all_transactions_order() {
        let hashes: Vec<String> = sample()
            .all_transactions()
            .into_iter()
            .map(|tx| tx.txhash)
            .collect();
        assert_eq!(hashes, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_find_across_categories() {
        let state = sample();
        assert_eq!(state.find("B").map(|tx| tx.height), Some(2));
        assert!(state.find("Z").is_none());
    }

    #[test]
    fn test_untimed_heights_skips_timed() {
        let mut state = sample();
        state.staking[0].time = Some(1);
        // "C" at height 1 is still untimed
        assert_eq!(state.untimed_heights(), vec![1, 2]);
        state.wallet[0].time = Some(1);
        assert_eq!(state.untimed_heights(), vec![2]);
    }
}
