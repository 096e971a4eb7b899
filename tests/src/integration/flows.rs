//! # Integration Test Flows
//!
//! Tests that wc-01-transaction-history and wc-02-proposal-deposits work
//! together inside one runtime, sharing the session and the event bus.
//!
//! ## Flows Tested:
//!
//! 1. **Sign in → fetch → reconnect**: a fetch before the node is reachable
//!    is deferred and replayed on reconnect
//! 2. **Deposit → refetch**: a submitted deposit refetches the proposal's
//!    deposits and refreshes the proposal
//! 3. **Sign out**: per-account history is cleared and announced
//! 4. **Notifications**: failures from both modules reach one subscriber
//! 5. **Overlapping fetches**: the latest fetch wins

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    // Shared infrastructure
    use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, WalletEvent, WalletModule};
    use shared_types::{
        Address, Coin, DepositRecord, FetchOutcome, ProposalId, SessionHandle, SkipReason,
        TxCategory, TxRecord,
    };
    use wallet_telemetry::MemoryReporter;

    // Module 01: Transaction History
    use wc_01_transaction_history::{
        invariant_tagged, invariant_unique_hashes, MockNode, TransactionHistoryService, TxCounts,
        TxHistoryConfig, TxHistoryError,
    };

    // Module 02: Proposal Deposits
    use wc_02_proposal_deposits::{
        DepositConfig, DepositError, DepositRequest, MockDepositNode, ProposalDepositsService,
        SubmitType,
    };

    use wallet_runtime::{CommandError, CommandResult, StoreCommand, WalletRuntime};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const ME: &str = "cosmos1me";
    const JAN_1: i64 = 1_609_459_200_000;
    const JAN_2: i64 = 1_609_545_600_000;

    struct Wallet {
        runtime: WalletRuntime,
        node: Arc<MockNode>,
        deposit_node: Arc<MockDepositNode>,
        reporter: Arc<MemoryReporter>,
    }

    /// History spread over two blocks, with a send that shows up both as a
    /// governance deposit and a wallet send.
    fn history_node() -> MockNode {
        MockNode::new()
            .with_txs(TxCategory::Staking, vec![TxRecord::new("DELEGATE", 10)])
            .with_txs(
                TxCategory::Governance,
                vec![TxRecord::new("DEPOSIT", 11), TxRecord::new("DEPOSIT", 11)],
            )
            .with_txs(
                TxCategory::Wallet,
                vec![TxRecord::new("SEND", 10), TxRecord::new("DEPOSIT", 11)],
            )
            .with_block(10, "2021-01-01T00:00:00Z")
            .with_block(11, "2021-01-02T00:00:00Z")
    }

    fn wallet(node: MockNode, deposit_node: MockDepositNode) -> Wallet {
        let node = Arc::new(node);
        let deposit_node = Arc::new(deposit_node);
        let session = SessionHandle::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let reporter = Arc::new(MemoryReporter::new());

        let transactions = Arc::new(TransactionHistoryService::new(
            TxHistoryConfig::for_testing(),
            node.clone(),
            node.clone(),
            Arc::new(session.clone()),
            bus.clone(),
            reporter.clone(),
        ));
        let deposits = Arc::new(ProposalDepositsService::new(
            DepositConfig::for_testing(),
            deposit_node.clone(),
            deposit_node.clone(),
            deposit_node.clone(),
            Arc::new(session.clone()),
            bus.clone(),
            reporter.clone(),
        ));

        Wallet {
            runtime: WalletRuntime::new(session, bus, transactions, deposits),
            node,
            deposit_node,
            reporter,
        }
    }

    async fn sign_in(runtime: &WalletRuntime) {
        runtime
            .dispatch(StoreCommand::SignIn {
                address: Address::from(ME),
            })
            .await
            .unwrap();
    }

    fn deposit(proposal_id: u64, amount: &str) -> DepositRequest {
        DepositRequest {
            proposal_id: ProposalId::from(proposal_id),
            amount: vec![Coin::new("stake", amount)],
            password: "1234567890".into(),
            submit_type: SubmitType::Local,
        }
    }

    // =============================================================================
    // FLOW 1: SIGN IN → FETCH → RECONNECT
    // =============================================================================

    #[tokio::test]
    async fn test_deferred_fetch_replayed_on_reconnect() {
        let w = wallet(history_node(), MockDepositNode::new());
        sign_in(&w.runtime).await;

        let result = w.runtime.dispatch(StoreCommand::GetAllTxs).await.unwrap();
        assert_eq!(
            result,
            CommandResult::Transactions(FetchOutcome::Skipped(SkipReason::NotConnected))
        );
        assert!(w.runtime.transactions().snapshot().value.loading);
        assert_eq!(w.node.tx_calls(TxCategory::Staking), 0);

        let result = w
            .runtime
            .dispatch(StoreCommand::SetConnected(true))
            .await
            .unwrap();
        assert_eq!(
            result,
            CommandResult::Reconnected(Some(FetchOutcome::Loaded(TxCounts {
                staking: 1,
                governance: 1,
                wallet: 2,
            })))
        );

        let state = w.runtime.transactions().snapshot().value;
        assert!(!state.loading);
        assert!(state.loaded);
        assert!(state.error.is_none());
        for category in TxCategory::ALL {
            assert!(invariant_unique_hashes(state.category(category)));
        }
        assert!(invariant_tagged(&state));

        // One lookup per distinct height, no matter how many records share it.
        let mut lookups = w.node.block_lookups();
        lookups.sort_unstable();
        assert_eq!(lookups, vec![10, 11]);

        let all = w.runtime.transactions().all_transactions();
        let times: Vec<_> = all.iter().map(|tx| (tx.txhash.as_str(), tx.time)).collect();
        assert_eq!(
            times,
            vec![
                ("DELEGATE", Some(JAN_1)),
                ("DEPOSIT", Some(JAN_2)),
                ("SEND", Some(JAN_1)),
                ("DEPOSIT", Some(JAN_2)),
            ]
        );
    }

    #[tokio::test]
    async fn test_reconnect_without_pending_fetch_is_noop() {
        let w = wallet(history_node(), MockDepositNode::new());
        w.runtime
            .dispatch(StoreCommand::SetConnected(true))
            .await
            .unwrap();
        sign_in(&w.runtime).await;
        w.runtime.dispatch(StoreCommand::GetAllTxs).await.unwrap();

        let result = w
            .runtime
            .dispatch(StoreCommand::Reconnected)
            .await
            .unwrap();
        assert_eq!(result, CommandResult::Reconnected(None));
        assert_eq!(w.node.tx_calls(TxCategory::Wallet), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_retried_on_reconnect() {
        let w = wallet(history_node().failing(TxCategory::Staking), MockDepositNode::new());
        w.runtime.session().set_connected(true);
        sign_in(&w.runtime).await;

        let result = w.runtime.dispatch(StoreCommand::GetAllTxs).await.unwrap();
        assert_eq!(
            result,
            CommandResult::Transactions(FetchOutcome::Failed(TxHistoryError::Node(
                "Mock staking failure".into()
            )))
        );
        let state = w.runtime.transactions().snapshot().value;
        assert!(state.loading);
        assert!(state.all_transactions().is_empty());

        w.node.set_failing(None);
        w.runtime
            .dispatch(StoreCommand::SetConnected(false))
            .await
            .unwrap();
        let result = w
            .runtime
            .dispatch(StoreCommand::SetConnected(true))
            .await
            .unwrap();
        assert!(matches!(
            result,
            CommandResult::Reconnected(Some(FetchOutcome::Loaded(_)))
        ));
        assert!(w.runtime.transactions().snapshot().value.error.is_none());
    }

    // =============================================================================
    // FLOW 2: DEPOSIT → REFETCH → REFRESH
    // =============================================================================

    #[tokio::test]
    async fn test_submit_deposit_refetches_and_refreshes() {
        let deposit_node = MockDepositNode::new().with_deposits(
            ProposalId::from(7),
            vec![DepositRecord::new(
                "cosmos1other",
                vec![Coin::new("stake", "10")],
            )],
        );
        let w = wallet(MockNode::new(), deposit_node);
        w.runtime.session().set_connected(true);
        sign_in(&w.runtime).await;

        let result = w
            .runtime
            .dispatch(StoreCommand::GetProposalDeposits {
                proposal_id: ProposalId::from(7),
            })
            .await
            .unwrap();
        assert_eq!(result, CommandResult::Deposits(FetchOutcome::Loaded(1)));

        let mut sub = w
            .runtime
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::Deposits]));
        let result = w
            .runtime
            .dispatch(StoreCommand::SubmitDeposit(deposit(7, "5")))
            .await
            .unwrap();
        let CommandResult::Submitted(report) = result else {
            panic!("expected a submit report, got {result:?}");
        };
        assert_eq!(report.receipt.txhash, "MOCKTX1");
        assert_eq!(report.deposits, FetchOutcome::Loaded(2));
        assert!(report.proposal_refreshed);

        let sent = w.deposit_node.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].depositor, Address::from(ME));
        assert_eq!(w.deposit_node.refreshed(), vec![ProposalId::from(7)]);

        let deposits = w
            .runtime
            .deposits()
            .deposits_for(&ProposalId::from(7))
            .unwrap();
        assert_eq!(deposits[1].depositor, ME);
        assert_eq!(
            sub.drain(),
            vec![
                WalletEvent::DepositSubmitted {
                    proposal_id: ProposalId::from(7),
                },
                WalletEvent::DepositsUpdated {
                    proposal_id: ProposalId::from(7),
                    count: 2,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_submit_succeeds_when_refetch_fails() {
        let w = wallet(MockNode::new(), MockDepositNode::new());
        w.runtime.session().set_connected(true);
        sign_in(&w.runtime).await;
        w.deposit_node.set_fail_fetch(true);

        let result = w
            .runtime
            .dispatch(StoreCommand::SubmitDeposit(deposit(3, "1")))
            .await
            .unwrap();
        let CommandResult::Submitted(report) = result else {
            panic!("expected a submit report, got {result:?}");
        };
        assert_eq!(
            report.deposits,
            FetchOutcome::Failed(DepositError::Node("Mock deposits failure".into()))
        );
        assert!(report.proposal_refreshed);
        assert_eq!(w.reporter.count(), 1);
        assert!(w
            .runtime
            .deposits()
            .deposits_for(&ProposalId::from(3))
            .is_none());
    }

    #[tokio::test]
    async fn test_rejected_deposit_is_command_error() {
        let w = wallet(MockNode::new(), MockDepositNode::new());
        w.runtime.session().set_connected(true);
        sign_in(&w.runtime).await;
        w.deposit_node.set_fail_send(true);

        let result = w
            .runtime
            .dispatch(StoreCommand::SubmitDeposit(deposit(3, "1")))
            .await;
        assert_eq!(
            result,
            Err(CommandError::Deposit(DepositError::Node(
                "Mock send failure".into()
            )))
        );
        assert!(w.deposit_node.fetch_calls().is_empty());
        assert!(w.deposit_node.refreshed().is_empty());
    }

    // =============================================================================
    // FLOW 3: SIGN OUT
    // =============================================================================

    #[tokio::test]
    async fn test_sign_out_clears_history_but_not_deposits() {
        let deposit_node = MockDepositNode::new().with_deposits(
            ProposalId::from(1),
            vec![DepositRecord::new("cosmos1other", vec![Coin::new("stake", "1")])],
        );
        let w = wallet(history_node(), deposit_node);
        w.runtime.session().set_connected(true);
        sign_in(&w.runtime).await;
        w.runtime.dispatch(StoreCommand::GetAllTxs).await.unwrap();
        w.runtime
            .dispatch(StoreCommand::GetProposalDeposits {
                proposal_id: ProposalId::from(1),
            })
            .await
            .unwrap();

        let mut sub = w
            .runtime
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::Session]));
        w.runtime.dispatch(StoreCommand::SignOut).await.unwrap();

        let state = w.runtime.transactions().snapshot().value;
        assert!(state.all_transactions().is_empty());
        assert!(!state.loaded);
        assert_eq!(sub.drain(), vec![WalletEvent::SessionReset]);

        // Deposits are per proposal, not per account.
        assert!(w
            .runtime
            .deposits()
            .deposits_for(&ProposalId::from(1))
            .is_some());

        let result = w.runtime.dispatch(StoreCommand::GetAllTxs).await.unwrap();
        assert_eq!(
            result,
            CommandResult::Transactions(FetchOutcome::Failed(TxHistoryError::MissingAddress))
        );
    }

    // =============================================================================
    // FLOW 4: NOTIFICATIONS
    // =============================================================================

    #[tokio::test]
    async fn test_failures_from_both_modules_reach_one_subscriber() {
        let w = wallet(
            history_node().failing(TxCategory::Governance),
            MockDepositNode::new(),
        );
        w.runtime.session().set_connected(true);
        sign_in(&w.runtime).await;
        w.deposit_node.set_fail_fetch(true);

        let mut sub = w
            .runtime
            .bus()
            .subscribe(EventFilter::topics(vec![EventTopic::Notifications]));

        w.runtime.dispatch(StoreCommand::GetAllTxs).await.unwrap();
        w.runtime
            .dispatch(StoreCommand::GetProposalDeposits {
                proposal_id: ProposalId::from(2),
            })
            .await
            .unwrap();

        let mut seen = Vec::new();
        for _ in 0..2 {
            let event = timeout(Duration::from_secs(1), sub.recv())
                .await
                .expect("notification should arrive")
                .expect("bus should be open");
            let WalletEvent::ErrorNotified {
                source,
                notification,
            } = event
            else {
                panic!("unexpected event {event:?}");
            };
            seen.push((source, notification.title, notification.body));
        }

        assert_eq!(
            seen,
            vec![
                (
                    WalletModule::Transactions,
                    "Error getting transactions".to_string(),
                    "Mock governance failure".to_string(),
                ),
                (
                    WalletModule::Deposits,
                    "Error fetching deposits on proposals".to_string(),
                    "Mock deposits failure".to_string(),
                ),
            ]
        );
        assert_eq!(w.reporter.count(), 2);
    }

    #[tokio::test]
    async fn test_connection_change_then_loaded_events() {
        let w = wallet(history_node(), MockDepositNode::new());
        sign_in(&w.runtime).await;
        w.runtime.dispatch(StoreCommand::GetAllTxs).await.unwrap();

        let mut sub = w.runtime.bus().subscribe(EventFilter::all());
        w.runtime
            .dispatch(StoreCommand::SetConnected(true))
            .await
            .unwrap();

        assert_eq!(
            sub.drain(),
            vec![
                WalletEvent::ConnectionChanged { connected: true },
                WalletEvent::TransactionsLoaded {
                    staking: 1,
                    governance: 1,
                    wallet: 2,
                },
                WalletEvent::TransactionTimesResolved { heights: 2 },
            ]
        );
    }

    // =============================================================================
    // FLOW 5: OVERLAPPING FETCHES
    // =============================================================================

    #[tokio::test]
    async fn test_latest_fetch_wins() {
        let w = wallet(
            history_node().with_delay(Duration::from_millis(100)),
            MockDepositNode::new(),
        );
        w.runtime.session().set_connected(true);
        sign_in(&w.runtime).await;

        let slow_runtime = w.runtime.clone();
        let slow = tokio::spawn(async move { slow_runtime.dispatch(StoreCommand::GetAllTxs).await });
        tokio::time::sleep(Duration::from_millis(20)).await;

        w.node.set_delay(None);
        w.node
            .set_txs(TxCategory::Wallet, vec![TxRecord::new("LATEST", 10)]);
        let fast = w.runtime.dispatch(StoreCommand::GetAllTxs).await.unwrap();
        assert!(matches!(
            fast,
            CommandResult::Transactions(FetchOutcome::Loaded(_))
        ));

        let slow = slow.await.unwrap().unwrap();
        assert_eq!(slow, CommandResult::Transactions(FetchOutcome::Superseded));

        let state = w.runtime.transactions().snapshot().value;
        let wallet: Vec<_> = state.wallet.iter().map(|tx| tx.txhash.as_str()).collect();
        assert_eq!(wallet, vec!["LATEST"]);
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_sign_out_mid_fetch_discards_result() {
        let w = wallet(
            history_node().with_delay(Duration::from_millis(100)),
            MockDepositNode::new(),
        );
        w.runtime.session().set_connected(true);
        sign_in(&w.runtime).await;

        let pending_runtime = w.runtime.clone();
        let pending =
            tokio::spawn(async move { pending_runtime.dispatch(StoreCommand::GetAllTxs).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        w.runtime.dispatch(StoreCommand::SignOut).await.unwrap();

        let result = pending.await.unwrap().unwrap();
        assert_eq!(result, CommandResult::Transactions(FetchOutcome::Superseded));
        assert!(w.runtime.transactions().all_transactions().is_empty());
    }
}
