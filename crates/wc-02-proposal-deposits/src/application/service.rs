//! # Proposal Deposits Service
//!
//! Fetches are ticketed per proposal id: a newer fetch for the same proposal
//! supersedes an older one, fetches for different proposals never interfere.

use std::sync::Arc;

use async_trait::async_trait;
use shared_bus::{EventPublisher, Notification, WalletEvent, WalletModule};
use shared_types::{
    DepositRecord, FetchGenerations, FetchOutcome, ProposalId, SessionView, SkipReason, StateCell,
    Versioned,
};
use tracing::{debug, warn};
use wallet_telemetry::{log_event, ErrorReporter, DEPOSITS_SUBMITTED, FETCHES};

use crate::config::DepositConfig;
use crate::domain::{
    DepositError, DepositFetchOutcome, DepositRequest, DepositState, SendTxRequest, SubmitReport,
    ERROR_TITLE, MODULE_NAME,
};
use crate::ports::{DepositSource, ProposalDepositsApi, ProposalRefresher, TxSender};

#[derive(Debug, Clone, Default)]
struct DepositStore {
    view: DepositState,
    fetches: FetchGenerations<ProposalId>,
}

/// Proposal Deposits Service.
pub struct ProposalDepositsService<D, S, P>
where
    D: DepositSource,
    S: TxSender,
    P: ProposalRefresher,
{
    config: DepositConfig,
    node: Arc<D>,
    sender: Arc<S>,
    proposals: Arc<P>,
    session: Arc<dyn SessionView>,
    bus: Arc<dyn EventPublisher>,
    reporter: Arc<dyn ErrorReporter>,
    state: StateCell<DepositStore>,
}

impl<D, S, P> ProposalDepositsService<D, S, P>
where
    D: DepositSource,
    S: TxSender,
    P: ProposalRefresher,
{
    /// Create a service with empty state.
    pub fn new(
        config: DepositConfig,
        node: Arc<D>,
        sender: Arc<S>,
        proposals: Arc<P>,
        session: Arc<dyn SessionView>,
        bus: Arc<dyn EventPublisher>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            config,
            node,
            sender,
            proposals,
            session,
            bus,
            reporter,
            state: StateCell::default(),
        }
    }

    /// Get configuration.
    pub fn config(&self) -> &DepositConfig {
        &self.config
    }

    async fn notify(&self, error: &DepositError) {
        if !self.config.notify_on_error {
            return;
        }
        self.bus
            .publish(WalletEvent::ErrorNotified {
                source: WalletModule::Deposits,
                notification: Notification::new(ERROR_TITLE, error.to_string()),
            })
            .await;
    }

    async fn refresh_proposal(&self, proposal_id: &ProposalId) -> bool {
        match self.proposals.refresh_proposal(proposal_id).await {
            Ok(()) => true,
            Err(error) => {
                warn!(proposal_id = %proposal_id, error = %error, "Proposal refresh failed");
                self.reporter.capture(MODULE_NAME, &error);
                false
            }
        }
    }
}

#[async_trait]
impl<D, S, P> ProposalDepositsApi for ProposalDepositsService<D, S, P>
where
    D: DepositSource,
    S: TxSender,
    P: ProposalRefresher,
{
    async fn get_proposal_deposits(&self, proposal_id: &ProposalId) -> DepositFetchOutcome {
        if !self.session.session().connected {
            self.state.mutate(|s| s.view.loading = true);
            debug!(proposal_id = %proposal_id, "Not connected, deferring deposit fetch");
            FETCHES.with_label_values(&[MODULE_NAME, "skipped"]).inc();
            return FetchOutcome::Skipped(SkipReason::NotConnected);
        }

        let ticket = self.state.mutate(|s| {
            s.view.loading = true;
            s.fetches.issue(proposal_id.clone())
        });
        debug!(
            proposal_id = %proposal_id,
            generation = ticket.generation(),
            "Fetching deposits"
        );

        let fetched = self.node.get_proposal_deposits(proposal_id).await;

        let committed = self.state.mutate_if(
            |s| s.fetches.is_current(proposal_id, &ticket),
            |s| {
                s.fetches.complete(proposal_id, &ticket);
                match &fetched {
                    Ok(deposits) => {
                        s.view.error = None;
                        s.view.loading = false;
                        s.view.loaded = true;
                        s.view.deposits.insert(proposal_id.clone(), deposits.clone());
                    }
                    Err(error) => s.view.error = Some(error.clone()),
                }
            },
        );
        if committed.is_none() {
            debug!(proposal_id = %proposal_id, "Deposit fetch superseded, discarding result");
            FETCHES.with_label_values(&[MODULE_NAME, "superseded"]).inc();
            return FetchOutcome::Superseded;
        }

        match fetched {
            Ok(deposits) => {
                let count = deposits.len();
                log_event!(
                    info,
                    MODULE_NAME,
                    "Deposits loaded",
                    proposal_id = %proposal_id,
                    count = count
                );
                FETCHES.with_label_values(&[MODULE_NAME, "loaded"]).inc();
                self.bus
                    .publish(WalletEvent::DepositsUpdated {
                        proposal_id: proposal_id.clone(),
                        count,
                    })
                    .await;
                FetchOutcome::Loaded(count)
            }
            Err(error) => {
                log_event!(
                    warn,
                    MODULE_NAME,
                    "Fetching deposits failed",
                    proposal_id = %proposal_id,
                    kind = error.kind(),
                    error = %error
                );
                FETCHES.with_label_values(&[MODULE_NAME, "failed"]).inc();
                self.reporter.capture(MODULE_NAME, &error);
                self.notify(&error).await;
                FetchOutcome::Failed(error)
            }
        }
    }

    async fn submit_deposit(&self, request: DepositRequest) -> Result<SubmitReport, DepositError> {
        let depositor = self
            .session
            .session()
            .address
            .ok_or(DepositError::MissingAddress)?;
        if request.amount.is_empty() {
            return Err(DepositError::EmptyAmount);
        }

        let proposal_id = request.proposal_id.clone();
        let tx = SendTxRequest::deposit(request, depositor);
        debug!(proposal_id = %proposal_id, tx = ?tx, "Sending deposit");

        let receipt = match self.sender.send_tx(tx).await {
            Ok(receipt) => receipt,
            Err(error) => {
                warn!(proposal_id = %proposal_id, error = %error, "Deposit rejected");
                return Err(error);
            }
        };

        DEPOSITS_SUBMITTED.inc();
        log_event!(
            info,
            MODULE_NAME,
            "Deposit submitted",
            proposal_id = %proposal_id,
            txhash = %receipt.txhash
        );
        self.bus
            .publish(WalletEvent::DepositSubmitted {
                proposal_id: proposal_id.clone(),
            })
            .await;

        let deposits = self.get_proposal_deposits(&proposal_id).await;
        let proposal_refreshed = self.refresh_proposal(&proposal_id).await;

        Ok(SubmitReport {
            receipt,
            deposits,
            proposal_refreshed,
        })
    }

    fn deposits_for(&self, proposal_id: &ProposalId) -> Option<Vec<DepositRecord>> {
        self.state
            .read(|s| s.view.deposits_for(proposal_id).map(<[_]>::to_vec))
    }

    fn snapshot(&self) -> Versioned<DepositState> {
        let Versioned { version, value } = self.state.snapshot();
        Versioned {
            version,
            value: value.view,
        }
    }
}
