//! # Wallet Runtime Library
//!
//! Composition root of the wallet core. The main entry point is the
//! `main.rs` binary; the library is exposed for integration tests and for
//! embedding the core in a UI shell.
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: modules define ports, this crate provides
//!   the adapters and wires them together
//! - **Single Writer**: each module owns its state; the view layer reads
//!   snapshots and acts through [`StoreCommand`]s
//! - **Event Bus**: notifications and lifecycle events flow over one
//!   in-memory bus

#![warn(missing_docs)]

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod wiring;

pub use adapters::{LcdClient, LcdError, ProposalSource, ProposalStore};
pub use container::{ConfigError, LcdConfig, WalletConfig};
pub use handlers::{CommandError, CommandResult, StoreCommand};
pub use wiring::{build_lcd_runtime, spawn_notification_logger, LcdRuntime, WalletRuntime};
