//! # Transaction History Service
//!
//! Fetches the three categories in parallel, commits them together, then
//! back-fills block times with one lookup per distinct height.
//!
//! Every fetch holds a ticket. A result is only committed while its ticket
//! is still the newest, so a slow fetch can never overwrite a newer one or
//! repopulate state after a session reset.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use futures::{stream, StreamExt, TryStreamExt};
use shared_bus::{EventPublisher, Notification, WalletEvent, WalletModule};
use shared_types::{
    Address, FetchGenerations, FetchOutcome, FetchTicket, Height, SessionView, SkipReason,
    StateCell, TxCategory, TxRecord, Versioned,
};
use tracing::{debug, warn};
use wallet_telemetry::{
    log_event, log_height_event, metric_inc, ErrorReporter, FETCHES, HEIGHT_LOOKUPS,
};

use crate::algorithms::{apply_block_times, distinct_heights, parse_block_time, tag_and_dedup};
use crate::config::TxHistoryConfig;
use crate::domain::{
    EnrichmentSummary, TxCounts, TxFetchOutcome, TxHistoryError, TxHistoryState, ERROR_TITLE,
    MODULE_NAME,
};
use crate::ports::{BlockInfoSource, TransactionHistoryApi, TxSource};

/// State plus the fetch tickets guarding it.
#[derive(Debug, Clone, Default)]
struct HistoryStore {
    view: TxHistoryState,
    fetches: FetchGenerations<()>,
}

impl HistoryStore {
    fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.fetches.is_current(&(), ticket)
    }
}

/// Transaction History Service.
pub struct TransactionHistoryService<N: TxSource, B: BlockInfoSource> {
    config: TxHistoryConfig,
    node: Arc<N>,
    blocks: Arc<B>,
    session: Arc<dyn SessionView>,
    bus: Arc<dyn EventPublisher>,
    reporter: Arc<dyn ErrorReporter>,
    state: StateCell<HistoryStore>,
}

impl<N: TxSource, B: BlockInfoSource> TransactionHistoryService<N, B> {
    /// Create a service with empty state.
    pub fn new(
        config: TxHistoryConfig,
        node: Arc<N>,
        blocks: Arc<B>,
        session: Arc<dyn SessionView>,
        bus: Arc<dyn EventPublisher>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            config,
            node,
            blocks,
            session,
            bus,
            reporter,
            state: StateCell::default(),
        }
    }

    /// Get configuration.
    pub fn config(&self) -> &TxHistoryConfig {
        &self.config
    }

    async fn fetch_category(
        &self,
        address: &Address,
        category: TxCategory,
    ) -> Result<Vec<TxRecord>, TxHistoryError> {
        debug!(category = %category, address = %address, "Fetching transactions");
        let records = match category {
            TxCategory::Staking => self.node.get_delegator_txs(address).await?,
            TxCategory::Governance => self.node.get_governance_txs(address).await?,
            TxCategory::Wallet => self.node.txs(address).await?,
        };
        Ok(tag_and_dedup(category, records))
    }

    async fn lookup_time(&self, height: Height) -> Result<(Height, Option<i64>), TxHistoryError> {
        metric_inc!(HEIGHT_LOOKUPS);
        match self.blocks.block_meta(height).await? {
            Some(meta) => Ok((height, Some(parse_block_time(height, &meta)?))),
            None => {
                log_height_event!(
                    debug,
                    MODULE_NAME,
                    "No block at height, leaving time unset",
                    height
                );
                Ok((height, None))
            }
        }
    }

    /// Look up every height concurrently, failing on the first error.
    async fn resolve_heights(
        &self,
        heights: &[Height],
    ) -> Result<Vec<(Height, Option<i64>)>, TxHistoryError> {
        let lookups: Vec<_> = heights
            .iter()
            .copied()
            .map(|h| self.lookup_time(h))
            .collect();
        match self.config.max_concurrent_lookups {
            0 => try_join_all(lookups).await,
            limit => {
                stream::iter(lookups)
                    .buffer_unordered(limit)
                    .try_collect()
                    .await
            }
        }
    }

    /// Resolve and commit times. `Ok(None)` when `ticket` was superseded.
    async fn enrich_with(
        &self,
        transactions: &[TxRecord],
        ticket: Option<FetchTicket>,
    ) -> Result<Option<EnrichmentSummary>, TxHistoryError> {
        let heights = distinct_heights(transactions);
        if heights.is_empty() {
            return Ok(Some(EnrichmentSummary::default()));
        }

        let resolved = self.resolve_heights(&heights).await?;
        let times: HashMap<Height, i64> = resolved
            .iter()
            .filter_map(|(h, t)| t.map(|t| (*h, t)))
            .collect();
        let unresolved: Vec<Height> = heights
            .iter()
            .copied()
            .filter(|h| !times.contains_key(h))
            .collect();

        let updated = match ticket {
            Some(ticket) => {
                match self.state.mutate_if(
                    |s| s.is_current(&ticket),
                    |s| apply_block_times(&mut s.view, &times),
                ) {
                    Some(updated) => updated,
                    None => return Ok(None),
                }
            }
            None => self.state.mutate(|s| apply_block_times(&mut s.view, &times)),
        };

        self.bus
            .publish(WalletEvent::TransactionTimesResolved {
                heights: heights.len(),
            })
            .await;

        Ok(Some(EnrichmentSummary {
            heights,
            unresolved,
            updated,
        }))
    }

    /// Record a failure for `ticket`, then report and notify.
    async fn fail(&self, ticket: FetchTicket, error: TxHistoryError) -> TxFetchOutcome {
        let recorded = self.state.mutate_if(
            |s| s.is_current(&ticket),
            |s| {
                s.view.error = Some(error.clone());
                s.fetches.complete(&(), &ticket);
            },
        );
        if recorded.is_none() {
            return self.superseded();
        }

        log_event!(
            warn,
            MODULE_NAME,
            "Fetching transactions failed",
            kind = error.kind(),
            error = %error
        );
        metric_inc!(FETCHES, &[MODULE_NAME, "failed"]);
        self.reporter.capture(MODULE_NAME, &error);
        if self.config.notify_on_error {
            self.bus
                .publish(WalletEvent::ErrorNotified {
                    source: WalletModule::Transactions,
                    notification: Notification::new(ERROR_TITLE, error.to_string()),
                })
                .await;
        }
        FetchOutcome::Failed(error)
    }

    fn superseded(&self) -> TxFetchOutcome {
        debug!("Transaction fetch superseded, discarding result");
        metric_inc!(FETCHES, &[MODULE_NAME, "superseded"]);
        FetchOutcome::Superseded
    }
}

#[async_trait]
impl<N: TxSource, B: BlockInfoSource> TransactionHistoryApi for TransactionHistoryService<N, B> {
    async fn get_all_txs(&self) -> TxFetchOutcome {
        let session = self.session.session();
        if !session.connected {
            self.state.mutate(|s| s.view.loading = true);
            debug!("Not connected, deferring transaction fetch");
            metric_inc!(FETCHES, &[MODULE_NAME, "skipped"]);
            return FetchOutcome::Skipped(SkipReason::NotConnected);
        }

        let ticket = self.state.mutate(|s| {
            s.view.loading = true;
            s.fetches.issue(())
        });

        let Some(address) = session.address else {
            return self.fail(ticket, TxHistoryError::MissingAddress).await;
        };

        let fetched = tokio::try_join!(
            self.fetch_category(&address, TxCategory::Staking),
            self.fetch_category(&address, TxCategory::Governance),
            self.fetch_category(&address, TxCategory::Wallet),
        );
        let (staking, governance, wallet) = match fetched {
            Ok(lists) => lists,
            Err(error) => return self.fail(ticket, error).await,
        };

        let committed = self.state.mutate_if(
            |s| s.is_current(&ticket),
            |s| {
                s.view.staking = staking;
                s.view.governance = governance;
                s.view.wallet = wallet;
                (TxCounts::of(&s.view), s.view.all_transactions())
            },
        );
        let Some((counts, transactions)) = committed else {
            return self.superseded();
        };

        log_event!(
            info,
            MODULE_NAME,
            "Transactions loaded",
            staking = counts.staking,
            governance = counts.governance,
            wallet = counts.wallet
        );
        self.bus
            .publish(WalletEvent::TransactionsLoaded {
                staking: counts.staking,
                governance: counts.governance,
                wallet: counts.wallet,
            })
            .await;

        match self.enrich_with(&transactions, Some(ticket)).await {
            Ok(Some(summary)) => {
                if !summary.unresolved.is_empty() {
                    warn!(heights = ?summary.unresolved, "Block times unavailable");
                }
            }
            Ok(None) => return self.superseded(),
            Err(error) => return self.fail(ticket, error).await,
        }

        let finished = self.state.mutate_if(
            |s| s.is_current(&ticket),
            |s| {
                s.view.loading = false;
                s.view.loaded = true;
                s.view.error = None;
                s.fetches.complete(&(), &ticket);
            },
        );
        if finished.is_none() {
            return self.superseded();
        }

        metric_inc!(FETCHES, &[MODULE_NAME, "loaded"]);
        FetchOutcome::Loaded(counts)
    }

    async fn get_tx(&self, category: TxCategory) -> Result<Vec<TxRecord>, TxHistoryError> {
        let address = self
            .session
            .session()
            .address
            .ok_or(TxHistoryError::MissingAddress)?;
        self.fetch_category(&address, category).await
    }

    async fn enrich_transactions(
        &self,
        transactions: &[TxRecord],
    ) -> Result<EnrichmentSummary, TxHistoryError> {
        Ok(self
            .enrich_with(transactions, None)
            .await?
            .unwrap_or_default())
    }

    async fn query_transaction_time(&self, height: Height) -> Result<Option<i64>, TxHistoryError> {
        let (_, time) = self.lookup_time(height).await?;
        if let Some(time) = time {
            let times = HashMap::from([(height, time)]);
            self.state
                .mutate(|s| apply_block_times(&mut s.view, &times));
        }
        Ok(time)
    }

    async fn reconnected(&self) -> Option<TxFetchOutcome> {
        let pending = self.state.read(|s| s.view.loading);
        if !pending || !self.session.session().signed_in {
            return None;
        }
        log_event!(info, MODULE_NAME, "Reconnected with a pending fetch, refetching");
        Some(self.get_all_txs().await)
    }

    fn reset_session_data(&self) {
        self.state.mutate(|s| {
            s.view = TxHistoryState::default();
            s.fetches.invalidate_all();
        });
        log_event!(debug, MODULE_NAME, "Transaction history reset");
    }

    fn snapshot(&self) -> Versioned<TxHistoryState> {
        let Versioned { version, value } = self.state.snapshot();
        Versioned {
            version,
            value: value.view,
        }
    }

    fn all_transactions(&self) -> Vec<TxRecord> {
        self.state.read(|s| s.view.all_transactions())
    }
}
