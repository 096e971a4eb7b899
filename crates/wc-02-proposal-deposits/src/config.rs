//! # Proposal Deposits Configuration

use serde::{Deserialize, Serialize};

/// Proposal deposits configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositConfig {
    /// Publish an error notification on failed fetches.
    pub notify_on_error: bool,
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            notify_on_error: true,
        }
    }
}

impl DepositConfig {
    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self::default()
    }
}
