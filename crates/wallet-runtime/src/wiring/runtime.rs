//! Runtime assembly.

use std::sync::Arc;

use shared_bus::{EventPublisher, InMemoryEventBus, WalletEvent};
use shared_types::{SessionHandle, SessionView};
use tracing::info;
use wallet_telemetry::ErrorReporter;
use wc_01_transaction_history::{
    CachedBlockSource, TransactionHistoryApi, TransactionHistoryService,
};
use wc_02_proposal_deposits::{ProposalDepositsApi, ProposalDepositsService};

use crate::adapters::{LcdClient, LcdError, ProposalStore};
use crate::container::WalletConfig;
use crate::handlers::{handle, CommandError, CommandResult, StoreCommand};

/// The assembled wallet core.
#[derive(Clone)]
pub struct WalletRuntime {
    session: SessionHandle,
    bus: Arc<InMemoryEventBus>,
    transactions: Arc<dyn TransactionHistoryApi>,
    deposits: Arc<dyn ProposalDepositsApi>,
}

impl WalletRuntime {
    /// Assemble a runtime from already-built modules.
    ///
    /// The modules must have been built with the same `session` and `bus`.
    pub fn new(
        session: SessionHandle,
        bus: Arc<InMemoryEventBus>,
        transactions: Arc<dyn TransactionHistoryApi>,
        deposits: Arc<dyn ProposalDepositsApi>,
    ) -> Self {
        Self {
            session,
            bus,
            transactions,
            deposits,
        }
    }

    /// Session shared by both modules.
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Event bus shared by both modules.
    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// Transaction history module.
    pub fn transactions(&self) -> &Arc<dyn TransactionHistoryApi> {
        &self.transactions
    }

    /// Proposal deposits module.
    pub fn deposits(&self) -> &Arc<dyn ProposalDepositsApi> {
        &self.deposits
    }

    /// Run one store command.
    pub async fn dispatch(&self, command: StoreCommand) -> Result<CommandResult, CommandError> {
        handle(self, command).await
    }

    /// Clear per-account state and tell subscribers.
    pub(crate) async fn reset_session(&self) {
        self.transactions.reset_session_data();
        self.bus.publish(WalletEvent::SessionReset).await;
    }

    /// Whether the session is connected.
    pub fn is_connected(&self) -> bool {
        self.session.session().connected
    }
}

/// Runtime wired to an LCD node, with the concrete handles the CLI needs.
pub struct LcdRuntime {
    /// The runtime.
    pub runtime: WalletRuntime,
    /// The node client.
    pub client: Arc<LcdClient>,
    /// Proposals refreshed after deposits.
    pub proposals: Arc<ProposalStore<LcdClient>>,
}

/// Wire both modules to an LCD node.
pub fn build_lcd_runtime(
    config: &WalletConfig,
    reporter: Arc<dyn ErrorReporter>,
) -> Result<LcdRuntime, LcdError> {
    let client = Arc::new(LcdClient::new(&config.lcd)?);
    let session = SessionHandle::new();
    let bus = Arc::new(InMemoryEventBus::with_capacity(config.bus_capacity));
    let session_view: Arc<dyn SessionView> = Arc::new(session.clone());

    let blocks = Arc::new(CachedBlockSource::new(
        client.clone(),
        config.history.block_cache_size,
    ));
    let transactions = Arc::new(TransactionHistoryService::new(
        config.history.clone(),
        client.clone(),
        blocks,
        session_view.clone(),
        bus.clone(),
        reporter.clone(),
    ));

    let proposals = Arc::new(ProposalStore::new(client.clone()));
    let deposits = Arc::new(ProposalDepositsService::new(
        config.deposits.clone(),
        client.clone(),
        client.clone(),
        proposals.clone(),
        session_view,
        bus.clone(),
        reporter,
    ));

    info!(lcd = %client.base_url(), "Wallet runtime wired");

    Ok(LcdRuntime {
        runtime: WalletRuntime::new(session, bus, transactions, deposits),
        client,
        proposals,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wallet_telemetry::MemoryReporter;

    #[test]
    fn test_build_lcd_runtime_starts_disconnected() {
        let wired =
            build_lcd_runtime(&WalletConfig::for_testing(), Arc::new(MemoryReporter::new()))
                .unwrap();
        assert!(!wired.runtime.is_connected());
        assert_eq!(wired.client.base_url(), "http://127.0.0.1:1317");
        assert_eq!(wired.runtime.bus().capacity(), 64);
    }
}
