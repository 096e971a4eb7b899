//! # Error Types
//!
//! Errors shared by every wallet module.

use thiserror::Error;

/// Errors raised while interpreting shared entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// A transaction category name outside staking/governance/wallet.
    #[error("Unknown transaction type: {0}")]
    UnknownCategory(String),
}

/// Errors raised by the versioned state container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A compare-and-swap lost against a newer write.
    #[error("Stale state version: expected {expected}, found {actual}")]
    StaleVersion { expected: u64, actual: u64 },
}
