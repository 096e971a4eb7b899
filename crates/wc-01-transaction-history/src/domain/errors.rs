//! # Domain Errors
//!
//! Error types for the transaction history.
//!
//! Payloads are strings so errors can be cloned into state and published on
//! the bus.

use shared_types::Height;
use thiserror::Error;

/// Transaction history error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TxHistoryError {
    /// A fetch was attempted while connected but no wallet is signed in.
    #[error("No wallet address in session")]
    MissingAddress,

    /// The node answered with an error or could not be reached.
    ///
    /// Rendered verbatim so the notification body shows the node's message.
    #[error("{0}")]
    Node(String),

    /// The node's response could not be decoded.
    #[error("Malformed node response: {0}")]
    Decode(String),

    /// A block header carried a time that is not RFC 3339.
    #[error("Invalid block time {time:?} at height {height}")]
    InvalidBlockTime {
        /// Height of the offending block
        height: Height,
        /// Raw time string
        time: String,
    },
}

impl TxHistoryError {
    /// Short stable label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            TxHistoryError::MissingAddress => "missing_address",
            TxHistoryError::Node(_) => "node",
            TxHistoryError::Decode(_) => "decode",
            TxHistoryError::InvalidBlockTime { .. } => "invalid_block_time",
        }
    }
}
