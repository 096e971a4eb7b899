//! Store commands.
//!
//! Every action the view layer can trigger, with typed payloads and typed
//! results.

use shared_bus::{EventPublisher, WalletEvent};
use shared_types::{Address, ProposalId, SessionView};
use thiserror::Error;
use tracing::{debug, info};
use wc_01_transaction_history::TxFetchOutcome;
use wc_02_proposal_deposits::{DepositError, DepositFetchOutcome, DepositRequest, SubmitReport};

use crate::wiring::WalletRuntime;

/// A store action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCommand {
    /// Fetch the full transaction history of the signed-in wallet.
    GetAllTxs,
    /// Fetch the deposits of one proposal.
    GetProposalDeposits {
        /// The proposal
        proposal_id: ProposalId,
    },
    /// Deposit on a proposal.
    SubmitDeposit(DepositRequest),
    /// The node connection came back.
    Reconnected,
    /// Clear per-account state.
    ResetSessionData,
    /// Record a connection change.
    SetConnected(bool),
    /// Sign a wallet in.
    SignIn {
        /// Wallet address
        address: Address,
    },
    /// Sign the wallet out.
    SignOut,
}

/// What a command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Outcome of a transaction fetch.
    Transactions(TxFetchOutcome),
    /// Outcome of a deposit fetch.
    Deposits(DepositFetchOutcome),
    /// A deposit was accepted.
    Submitted(SubmitReport),
    /// Reconnect handling; `None` when nothing was pending.
    Reconnected(Option<TxFetchOutcome>),
    /// The command only changed session state.
    Done,
}

/// Command failures.
///
/// Fetch failures are not command failures: they are stored in module state
/// and notified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The deposit transaction failed.
    #[error("Deposit failed: {0}")]
    Deposit(#[from] DepositError),
}

/// Run `command` against `runtime`.
pub async fn handle(
    runtime: &WalletRuntime,
    command: StoreCommand,
) -> Result<CommandResult, CommandError> {
    debug!(command = ?command, "Dispatching store command");
    match command {
        StoreCommand::GetAllTxs => Ok(CommandResult::Transactions(
            runtime.transactions().get_all_txs().await,
        )),

        StoreCommand::GetProposalDeposits { proposal_id } => Ok(CommandResult::Deposits(
            runtime.deposits().get_proposal_deposits(&proposal_id).await,
        )),

        StoreCommand::SubmitDeposit(request) => {
            let report = runtime.deposits().submit_deposit(request).await?;
            Ok(CommandResult::Submitted(report))
        }

        StoreCommand::Reconnected => Ok(CommandResult::Reconnected(
            runtime.transactions().reconnected().await,
        )),

        StoreCommand::ResetSessionData => {
            runtime.reset_session().await;
            Ok(CommandResult::Done)
        }

        StoreCommand::SetConnected(connected) => {
            let was_connected = runtime.session().session().connected;
            runtime.session().set_connected(connected);
            if was_connected == connected {
                return Ok(CommandResult::Done);
            }

            info!(connected, "Node connection changed");
            runtime
                .bus()
                .publish(WalletEvent::ConnectionChanged { connected })
                .await;
            if connected {
                return Ok(CommandResult::Reconnected(
                    runtime.transactions().reconnected().await,
                ));
            }
            Ok(CommandResult::Done)
        }

        StoreCommand::SignIn { address } => {
            runtime.reset_session().await;
            runtime.session().sign_in(address);
            Ok(CommandResult::Done)
        }

        StoreCommand::SignOut => {
            runtime.session().sign_out();
            runtime.reset_session().await;
            Ok(CommandResult::Done)
        }
    }
}
