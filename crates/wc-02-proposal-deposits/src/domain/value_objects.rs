//! # Domain Value Objects
//!
//! Deposit requests and the transaction payload handed to the sender.

use std::fmt;

use serde::{Deserialize, Serialize};
use shared_types::{Address, Coin, FetchOutcome, Height, ProposalId};

use super::errors::DepositError;

/// Module name used in logs, metrics and bus events.
pub const MODULE_NAME: &str = "deposits";

/// Title of the notification raised when fetching deposits fails.
pub const ERROR_TITLE: &str = "Error fetching deposits on proposals";

/// How the transaction is signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitType {
    /// Key stored by the wallet, unlocked with the password.
    #[default]
    Local,
    /// Hardware wallet.
    Ledger,
}

/// A deposit the user wants to make.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Proposal to deposit on.
    pub proposal_id: ProposalId,
    /// Coins to deposit.
    pub amount: Vec<Coin>,
    /// Password unlocking the local key.
    pub password: String,
    /// Signing method.
    #[serde(default)]
    pub submit_type: SubmitType,
}

impl fmt::Debug for DepositRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepositRequest")
            .field("proposal_id", &self.proposal_id)
            .field("amount", &self.amount)
            .field("password", &"<redacted>")
            .field("submit_type", &self.submit_type)
            .finish()
    }
}

/// Transaction kinds the sender understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TxKind {
    /// Deposit on a governance proposal.
    PostProposalDeposit,
}

/// Payload handed to the transaction sender.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendTxRequest {
    /// Transaction kind.
    #[serde(rename = "type")]
    pub kind: TxKind,
    /// Target of the transaction; the proposal id for deposits.
    pub to: String,
    /// Proposal deposited on.
    #[serde(rename = "proposal_id")]
    pub proposal_id: ProposalId,
    /// Address of the signed-in wallet.
    pub depositor: Address,
    /// Coins to deposit.
    pub amount: Vec<Coin>,
    /// Password unlocking the local key.
    pub password: String,
    /// Signing method.
    pub submit_type: SubmitType,
}

impl SendTxRequest {
    /// Build the deposit transaction for `depositor`.
    pub fn deposit(request: DepositRequest, depositor: Address) -> Self {
        Self {
            kind: TxKind::PostProposalDeposit,
            to: request.proposal_id.to_string(),
            proposal_id: request.proposal_id,
            depositor,
            amount: request.amount,
            password: request.password,
            submit_type: request.submit_type,
        }
    }
}

impl fmt::Debug for SendTxRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendTxRequest")
            .field("kind", &self.kind)
            .field("to", &self.to)
            .field("depositor", &self.depositor)
            .field("amount", &self.amount)
            .field("password", &"<redacted>")
            .field("submit_type", &self.submit_type)
            .finish()
    }
}

/// What the node returned for an accepted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash.
    pub txhash: String,
    /// Block the transaction was included in, if already known.
    #[serde(default)]
    pub height: Option<Height>,
}

/// Outcome of a deposit fetch; carries the number of deposits stored.
pub type DepositFetchOutcome = FetchOutcome<usize, DepositError>;

/// What happened after the deposit transaction was accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReport {
    /// Receipt of the deposit transaction.
    pub receipt: TxReceipt,
    /// Outcome of refetching the proposal's deposits.
    pub deposits: DepositFetchOutcome,
    /// Whether the proposal was refreshed.
    pub proposal_refreshed: bool,
}
