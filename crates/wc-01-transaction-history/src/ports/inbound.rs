//! # Inbound Ports
//!
//! API trait defining what the transaction history can do.

use async_trait::async_trait;
use shared_types::{Height, TxCategory, TxRecord, Versioned};

use crate::domain::{EnrichmentSummary, TxFetchOutcome, TxHistoryError, TxHistoryState};

/// Transaction history API - inbound port.
#[async_trait]
pub trait TransactionHistoryApi: Send + Sync {
    /// Fetch all three categories for the session address, commit them and
    /// back-fill block times.
    ///
    /// Does nothing (beyond raising `loading`) while disconnected.
    async fn get_all_txs(&self) -> TxFetchOutcome;

    /// Fetch one category from the node, tagged and deduplicated.
    ///
    /// Does not touch state.
    async fn get_tx(&self, category: TxCategory) -> Result<Vec<TxRecord>, TxHistoryError>;

    /// Resolve the block time of every distinct height in `transactions`
    /// and write it onto matching records in state.
    async fn enrich_transactions(
        &self,
        transactions: &[TxRecord],
    ) -> Result<EnrichmentSummary, TxHistoryError>;

    /// Resolve one height and write its time onto matching records.
    ///
    /// Returns `None` when the node has no block at `height`.
    async fn query_transaction_time(&self, height: Height) -> Result<Option<i64>, TxHistoryError>;

    /// Refetch after the node connection came back, if a fetch was pending
    /// and a wallet is signed in.
    async fn reconnected(&self) -> Option<TxFetchOutcome>;

    /// Return to the initial state and supersede in-flight fetches.
    fn reset_session_data(&self);

    /// Current state with its version.
    fn snapshot(&self) -> Versioned<TxHistoryState>;

    /// Every record, staking first, then governance, then wallet.
    fn all_transactions(&self) -> Vec<TxRecord>;
}
