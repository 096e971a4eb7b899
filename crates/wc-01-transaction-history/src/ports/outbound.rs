//! # Outbound Ports
//!
//! Traits for the node queries the transaction history depends on.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{Address, BlockMeta, Height, TxCategory, TxRecord};

use crate::domain::TxHistoryError;

/// Transaction queries - outbound port.
///
/// Each call returns every transaction of its category that involves
/// `address`. Duplicates are allowed; an empty result is not an error.
#[async_trait]
pub trait TxSource: Send + Sync {
    /// Delegation, undelegation and redelegation transactions.
    async fn get_delegator_txs(&self, address: &Address) -> Result<Vec<TxRecord>, TxHistoryError>;

    /// Proposals submitted, deposits made and votes cast.
    async fn get_governance_txs(&self, address: &Address)
        -> Result<Vec<TxRecord>, TxHistoryError>;

    /// Transfers sent or received.
    async fn txs(&self, address: &Address) -> Result<Vec<TxRecord>, TxHistoryError>;
}

/// Block metadata queries - outbound port.
#[async_trait]
pub trait BlockInfoSource: Send + Sync {
    /// Metadata of the block at `height`, `None` if the node has none.
    async fn block_meta(&self, height: Height) -> Result<Option<BlockMeta>, TxHistoryError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

#[derive(Default)]
struct MockNodeData {
    txs: HashMap<TxCategory, Vec<TxRecord>>,
    blocks: HashMap<Height, BlockMeta>,
    failing_category: Option<TxCategory>,
    failing_heights: HashSet<Height>,
    delay: Option<Duration>,
}

/// Mock node for testing.
///
/// Answers from in-memory fixtures and counts every call.
#[derive(Default)]
pub struct MockNode {
    data: Mutex<MockNodeData>,
    tx_calls: Mutex<HashMap<TxCategory, usize>>,
    block_lookups: Mutex<Vec<Height>>,
}

impl MockNode {
    /// Empty node: no transactions, no blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `records` for `category`.
    pub fn with_txs(self, category: TxCategory, records: Vec<TxRecord>) -> Self {
        self.set_txs(category, records);
        self
    }

    /// Serve a block at `height` with ISO-8601 `time`.
    pub fn with_block(self, height: Height, time: &str) -> Self {
        self.data
            .lock()
            .blocks
            .insert(height, BlockMeta::new(height, time));
        self
    }

    /// Fail every query for `category`.
    pub fn failing(self, category: TxCategory) -> Self {
        self.set_failing(Some(category));
        self
    }

    /// Fail the block lookup for `height`.
    pub fn failing_height(self, height: Height) -> Self {
        self.data.lock().failing_heights.insert(height);
        self
    }

    /// Sleep before answering category queries.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.set_delay(Some(delay));
        self
    }

    /// Replace the records served for `category`.
    pub fn set_txs(&self, category: TxCategory, records: Vec<TxRecord>) {
        self.data.lock().txs.insert(category, records);
    }

    /// Change which category fails.
    pub fn set_failing(&self, category: Option<TxCategory>) {
        self.data.lock().failing_category = category;
    }

    /// Change the category query delay.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.data.lock().delay = delay;
    }

    /// Number of queries issued for `category`.
    pub fn tx_calls(&self, category: TxCategory) -> usize {
        self.tx_calls.lock().get(&category).copied().unwrap_or(0)
    }

    /// Heights looked up so far, in call order.
    pub fn block_lookups(&self) -> Vec<Height> {
        self.block_lookups.lock().clone()
    }

    async fn answer(&self, category: TxCategory) -> Result<Vec<TxRecord>, TxHistoryError> {
        *self.tx_calls.lock().entry(category).or_insert(0) += 1;

        let delay = self.data.lock().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let data = self.data.lock();
        if data.failing_category == Some(category) {
            return Err(TxHistoryError::Node(format!("Mock {category} failure")));
        }
        Ok(data.txs.get(&category).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl TxSource for MockNode {
    async fn get_delegator_txs(&self, _address: &Address) -> Result<Vec<TxRecord>, TxHistoryError> {
        self.answer(TxCategory::Staking).await
    }

    async fn get_governance_txs(
        &self,
        _address: &Address,
    ) -> Result<Vec<TxRecord>, TxHistoryError> {
        self.answer(TxCategory::Governance).await
    }

    async fn txs(&self, _address: &Address) -> Result<Vec<TxRecord>, TxHistoryError> {
        self.answer(TxCategory::Wallet).await
    }
}

#[async_trait]
impl BlockInfoSource for MockNode {
    async fn block_meta(&self, height: Height) -> Result<Option<BlockMeta>, TxHistoryError> {
        self.block_lookups.lock().push(height);

        let data = self.data.lock();
        if data.failing_heights.contains(&height) {
            return Err(TxHistoryError::Node(format!("Mock block {height} failure")));
        }
        Ok(data.blocks.get(&height).cloned())
    }
}
