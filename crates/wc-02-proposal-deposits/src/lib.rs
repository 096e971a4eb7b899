//! # WC-02 Proposal Deposits
//!
//! Keeps the deposits of governance proposals, keyed by proposal id, and
//! submits new deposits.
//!
//! **Module ID:** 02
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Submission
//!
//! A deposit is submitted in three sequential steps:
//!
//! 1. Send the signed `postProposalDeposit` transaction
//! 2. Refetch the deposits of the proposal
//! 3. Refresh the proposal itself
//!
//! Only step 1 can fail the submission. Once the node accepted the
//! transaction the funds have moved, so failures in steps 2 and 3 are
//! notified and reported but never rolled back.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::ProposalDepositsService;
pub use config::DepositConfig;
pub use domain::{
    DepositError, DepositFetchOutcome, DepositRequest, DepositState, SendTxRequest, SubmitReport,
    SubmitType, TxKind, TxReceipt, ERROR_TITLE, MODULE_NAME,
};
pub use ports::{DepositSource, MockDepositNode, ProposalDepositsApi, ProposalRefresher, TxSender};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
