//! # Runtime Container
//!
//! Configuration for the composition root.

pub mod config;

pub use config::{ConfigError, LcdConfig, WalletConfig};
