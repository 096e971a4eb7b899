//! Proposal store.
//!
//! Keeps the last fetched copy of each proposal for the view layer and
//! answers the deposits module's refresh requests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::ProposalId;
use tracing::debug;
use wc_02_proposal_deposits::{DepositError, ProposalRefresher};

/// Proposal queries.
#[async_trait]
pub trait ProposalSource: Send + Sync {
    /// Raw proposal JSON, `None` if the node does not know it.
    async fn get_proposal(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<Option<serde_json::Value>, DepositError>;
}

/// Cache of fetched proposals.
pub struct ProposalStore<S: ProposalSource> {
    source: Arc<S>,
    proposals: RwLock<HashMap<ProposalId, serde_json::Value>>,
}

impl<S: ProposalSource> ProposalStore<S> {
    /// Empty store backed by `source`.
    pub fn new(source: Arc<S>) -> Self {
        Self {
            source,
            proposals: RwLock::new(HashMap::new()),
        }
    }

    /// Last fetched copy of `proposal_id`.
    pub fn proposal(&self, proposal_id: &ProposalId) -> Option<serde_json::Value> {
        self.proposals.read().get(proposal_id).cloned()
    }
}

#[async_trait]
impl<S: ProposalSource> ProposalRefresher for ProposalStore<S> {
    async fn refresh_proposal(&self, proposal_id: &ProposalId) -> Result<(), DepositError> {
        let proposal = self
            .source
            .get_proposal(proposal_id)
            .await?
            .ok_or_else(|| DepositError::Node(format!("Proposal {proposal_id} not found")))?;
        debug!(proposal_id = %proposal_id, "Proposal refreshed");
        self.proposals.write().insert(proposal_id.clone(), proposal);
        Ok(())
    }
}
