//! # Inbound Ports

use async_trait::async_trait;
use shared_types::{DepositRecord, ProposalId, Versioned};

use crate::domain::{DepositError, DepositFetchOutcome, DepositRequest, DepositState, SubmitReport};

/// Proposal deposits API - inbound port.
#[async_trait]
pub trait ProposalDepositsApi: Send + Sync {
    /// Fetch the deposits of `proposal_id` and replace the stored entry.
    ///
    /// Does nothing (beyond raising `loading`) while disconnected.
    async fn get_proposal_deposits(&self, proposal_id: &ProposalId) -> DepositFetchOutcome;

    /// Send a deposit, then refetch the proposal's deposits and refresh the
    /// proposal.
    ///
    /// Fails only if the deposit transaction itself fails.
    async fn submit_deposit(&self, request: DepositRequest) -> Result<SubmitReport, DepositError>;

    /// Deposits stored for `proposal_id`.
    fn deposits_for(&self, proposal_id: &ProposalId) -> Option<Vec<DepositRecord>>;

    /// Current state with its version.
    fn snapshot(&self) -> Versioned<DepositState>;
}
