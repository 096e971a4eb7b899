//! # Adapters
//!
//! Implementations of the module ports against a real node.

pub mod lcd_client;
pub mod proposals;

pub use lcd_client::{LcdClient, LcdError};
pub use proposals::{ProposalSource, ProposalStore};
