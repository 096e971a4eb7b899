//! # Ports Module
//!
//! Hexagonal architecture ports for the transaction history.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
