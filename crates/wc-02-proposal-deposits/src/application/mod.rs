//! # Application Layer

pub mod service;

pub use service::ProposalDepositsService;
