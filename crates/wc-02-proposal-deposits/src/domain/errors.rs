//! # Domain Errors

use thiserror::Error;

/// Proposal deposit error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepositError {
    /// A deposit was submitted with no wallet signed in.
    #[error("No wallet address in session")]
    MissingAddress,

    /// A deposit was submitted with no coins.
    #[error("Deposit amount is empty")]
    EmptyAmount,

    /// The node answered with an error or could not be reached.
    ///
    /// Rendered verbatim so the notification body shows the node's message.
    #[error("{0}")]
    Node(String),

    /// The node's response could not be decoded.
    #[error("Malformed node response: {0}")]
    Decode(String),

    /// The node accepted the request but the transaction failed.
    #[error("Transaction rejected (code {code}): {log}")]
    Rejected {
        /// ABCI result code
        code: u32,
        /// Raw log from the node
        log: String,
    },
}

impl DepositError {
    /// Short stable label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DepositError::MissingAddress => "missing_address",
            DepositError::EmptyAmount => "empty_amount",
            DepositError::Node(_) => "node",
            DepositError::Decode(_) => "decode",
            DepositError::Rejected { .. } => "rejected",
        }
    }
}
