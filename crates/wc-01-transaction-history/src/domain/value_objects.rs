//! # Domain Value Objects

use shared_types::{FetchOutcome, Height, TxCategory};

use super::entities::TxHistoryState;
use super::errors::TxHistoryError;

/// Module name used in logs, metrics and bus events.
pub const MODULE_NAME: &str = "transactions";

/// Title of the notification raised when fetching transactions fails.
pub const ERROR_TITLE: &str = "Error getting transactions";

/// Number of records committed per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxCounts {
    /// Staking records.
    pub staking: usize,
    /// Governance records.
    pub governance: usize,
    /// Wallet records.
    pub wallet: usize,
}

impl TxCounts {
    /// Count the lists held by `state`.
    pub fn of(state: &TxHistoryState) -> Self {
        Self {
            staking: state.staking.len(),
            governance: state.governance.len(),
            wallet: state.wallet.len(),
        }
    }

    /// Count for one category.
    pub fn get(&self, category: TxCategory) -> usize {
        match category {
            TxCategory::Staking => self.staking,
            TxCategory::Governance => self.governance,
            TxCategory::Wallet => self.wallet,
        }
    }

    /// Sum over all categories.
    pub fn total(&self) -> usize {
        self.staking + self.governance + self.wallet
    }
}

/// What an enrichment pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    /// Distinct heights looked up.
    pub heights: Vec<Height>,
    /// Heights the node had no block for.
    pub unresolved: Vec<Height>,
    /// Records whose time was written.
    pub updated: usize,
}

/// Outcome of [`get_all_txs`](crate::ports::TransactionHistoryApi::get_all_txs).
pub type TxFetchOutcome = FetchOutcome<TxCounts, TxHistoryError>;
