//! # Application Layer
//!
//! Service orchestrating the history pipeline.

pub mod service;

pub use service::TransactionHistoryService;
