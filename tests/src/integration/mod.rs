//! # Integration Flows
//!
//! Both store modules wired into one [`wallet_runtime::WalletRuntime`] over
//! mock nodes, driven only through store commands.

pub mod flows;
