//! # Outbound Ports
//!
//! Traits for the node queries and the transaction sender.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{DepositRecord, ProposalId};

use crate::domain::{DepositError, SendTxRequest, TxReceipt};

/// Deposit queries - outbound port.
#[async_trait]
pub trait DepositSource: Send + Sync {
    /// All deposits made on `proposal_id`.
    async fn get_proposal_deposits(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<Vec<DepositRecord>, DepositError>;
}

/// Transaction signing and broadcast - outbound port.
#[async_trait]
pub trait TxSender: Send + Sync {
    /// Sign and broadcast `request`.
    async fn send_tx(&self, request: SendTxRequest) -> Result<TxReceipt, DepositError>;
}

/// Proposal refresh - outbound port.
///
/// Implemented by whatever keeps proposals for the view layer.
#[async_trait]
pub trait ProposalRefresher: Send + Sync {
    /// Refetch `proposal_id`.
    async fn refresh_proposal(&self, proposal_id: &ProposalId) -> Result<(), DepositError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

#[derive(Default)]
struct MockDepositData {
    deposits: HashMap<ProposalId, Vec<DepositRecord>>,
    fail_fetch: bool,
    fail_send: bool,
    fail_refresh: bool,
    delay: Option<Duration>,
}

/// Mock node for testing deposits.
///
/// An accepted deposit is appended to the proposal's fixture, the way a real
/// node would list it on the next query.
#[derive(Default)]
pub struct MockDepositNode {
    data: Mutex<MockDepositData>,
    fetch_calls: Mutex<Vec<ProposalId>>,
    sent: Mutex<Vec<SendTxRequest>>,
    refreshed: Mutex<Vec<ProposalId>>,
}

impl MockDepositNode {
    /// Node with no deposits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `deposits` for `proposal_id`.
    pub fn with_deposits(self, proposal_id: ProposalId, deposits: Vec<DepositRecord>) -> Self {
        self.data.lock().deposits.insert(proposal_id, deposits);
        self
    }

    /// Sleep before answering deposit queries.
    pub fn with_delay(self, delay: Duration) -> Self {
        self.data.lock().delay = Some(delay);
        self
    }

    /// Make deposit queries fail.
    pub fn set_fail_fetch(&self, fail: bool) {
        self.data.lock().fail_fetch = fail;
    }

    /// Make transaction sends fail.
    pub fn set_fail_send(&self, fail: bool) {
        self.data.lock().fail_send = fail;
    }

    /// Make proposal refreshes fail.
    pub fn set_fail_refresh(&self, fail: bool) {
        self.data.lock().fail_refresh = fail;
    }

    /// Change the query delay.
    pub fn set_delay(&self, delay: Option<Duration>) {
        self.data.lock().delay = delay;
    }

    /// Proposals queried so far, in call order.
    pub fn fetch_calls(&self) -> Vec<ProposalId> {
        self.fetch_calls.lock().clone()
    }

    /// Transactions sent so far.
    pub fn sent(&self) -> Vec<SendTxRequest> {
        self.sent.lock().clone()
    }

    /// Proposals refreshed so far.
    pub fn refreshed(&self) -> Vec<ProposalId> {
        self.refreshed.lock().clone()
    }
}

#[async_trait]
impl DepositSource for MockDepositNode {
    async fn get_proposal_deposits(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<Vec<DepositRecord>, DepositError> {
        self.fetch_calls.lock().push(proposal_id.clone());

        let delay = self.data.lock().delay;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let data = self.data.lock();
        if data.fail_fetch {
            return Err(DepositError::Node("Mock deposits failure".into()));
        }
        Ok(data.deposits.get(proposal_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl TxSender for MockDepositNode {
    async fn send_tx(&self, request: SendTxRequest) -> Result<TxReceipt, DepositError> {
        let mut data = self.data.lock();
        if data.fail_send {
            return Err(DepositError::Node("Mock send failure".into()));
        }
        data.deposits
            .entry(request.proposal_id.clone())
            .or_default()
            .push(DepositRecord::new(
                request.depositor.as_str(),
                request.amount.clone(),
            ));
        drop(data);

        let mut sent = self.sent.lock();
        sent.push(request);
        Ok(TxReceipt {
            txhash: format!("MOCKTX{}", sent.len()),
            height: None,
        })
    }
}

#[async_trait]
impl ProposalRefresher for MockDepositNode {
    async fn refresh_proposal(&self, proposal_id: &ProposalId) -> Result<(), DepositError> {
        if self.data.lock().fail_refresh {
            return Err(DepositError::Node("Mock proposal failure".into()));
        }
        self.refreshed.lock().push(proposal_id.clone());
        Ok(())
    }
}
