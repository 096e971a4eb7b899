//! # Domain Entities

use std::collections::HashMap;

use shared_types::{DepositRecord, ProposalId};

use super::errors::DepositError;

/// Proposal deposits state.
///
/// One `loading` flag covers every proposal, as the view layer shows a single
/// spinner for the deposits panel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DepositState {
    /// A fetch was started and has not completed successfully.
    pub loading: bool,
    /// At least one fetch completed successfully.
    pub loaded: bool,
    /// Error of the last failed fetch, cleared on success.
    pub error: Option<DepositError>,
    /// Deposits by proposal. Fetching a proposal replaces its entry.
    pub deposits: HashMap<ProposalId, Vec<DepositRecord>>,
}

impl DepositState {
    /// Deposits stored for `proposal_id`, if it was ever fetched.
    pub fn deposits_for(&self, proposal_id: &ProposalId) -> Option<&[DepositRecord]> {
        self.deposits.get(proposal_id).map(Vec::as_slice)
    }
}
