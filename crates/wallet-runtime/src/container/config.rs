//! # Wallet Configuration
//!
//! Unified configuration for the node connection and both modules.
//!
//! ## Environment
//!
//! - `WALLET_LCD_URL`: LCD REST endpoint (default `http://localhost:1317`)
//! - `WALLET_LCD_TIMEOUT_SECS`: request timeout (default 10)
//! - `WALLET_CHAIN_ID`: chain id put into signed transactions

use serde::{Deserialize, Serialize};
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use thiserror::Error;
use wc_01_transaction_history::TxHistoryConfig;
use wc_02_proposal_deposits::DepositConfig;

/// Complete wallet configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Node connection.
    pub lcd: LcdConfig,
    /// Transaction history module.
    pub history: TxHistoryConfig,
    /// Proposal deposits module.
    pub deposits: DepositConfig,
    /// Event bus channel capacity.
    pub bus_capacity: usize,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            lcd: LcdConfig::default(),
            history: TxHistoryConfig::default(),
            deposits: DepositConfig::default(),
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl WalletConfig {
    /// Defaults overridden from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("WALLET_LCD_URL") {
            config.lcd.url = url;
        }
        if let Ok(raw) = std::env::var("WALLET_LCD_TIMEOUT_SECS") {
            config.lcd.timeout_secs = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "WALLET_LCD_TIMEOUT_SECS",
                value: raw,
            })?;
        }
        if let Ok(chain_id) = std::env::var("WALLET_CHAIN_ID") {
            config.lcd.chain_id = chain_id;
        }

        Ok(config)
    }

    /// Check the configuration before wiring anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.lcd.url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::InvalidUrl(self.lcd.url.clone()));
        }
        if self.lcd.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.lcd.chain_id.trim().is_empty() {
            return Err(ConfigError::MissingChainId);
        }
        if self.bus_capacity == 0 {
            return Err(ConfigError::ZeroBusCapacity);
        }
        Ok(())
    }

    /// Create a config for testing.
    pub fn for_testing() -> Self {
        Self {
            lcd: LcdConfig {
                url: "http://127.0.0.1:1317".to_string(),
                timeout_secs: 1,
                connect_timeout_secs: 1,
                chain_id: "test-chain".to_string(),
            },
            history: TxHistoryConfig::for_testing(),
            deposits: DepositConfig::for_testing(),
            bus_capacity: 64,
        }
    }
}

/// LCD (light client daemon) REST connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LcdConfig {
    /// Base URL, without trailing slash.
    pub url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Chain id for transactions.
    pub chain_id: String,
}

impl Default for LcdConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:1317".to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 2,
            chain_id: "cosmoshub".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The LCD URL is not http(s).
    #[error("LCD URL must start with http:// or https://, got {0:?}")]
    InvalidUrl(String),

    /// The request timeout is zero.
    #[error("LCD request timeout must be at least one second")]
    ZeroTimeout,

    /// No chain id configured.
    #[error("Chain id is empty; set WALLET_CHAIN_ID")]
    MissingChainId,

    /// The event bus would drop every event.
    #[error("Event bus capacity must be positive")]
    ZeroBusCapacity,

    /// An environment variable could not be parsed.
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue {
        /// Variable name
        key: &'static str,
        /// Raw value
        value: String,
    },
}
