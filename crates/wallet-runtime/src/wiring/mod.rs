//! # Wiring
//!
//! Builds the runtime: one session, one event bus, both modules sharing them.
//!
//! ```text
//!   SessionHandle ──────────────┬───────────────────────┐
//!                               ▼                       ▼
//!                    TransactionHistoryService   ProposalDepositsService
//!                       │           │               │        │
//!                 TxSource   CachedBlockSource  DepositSource  ProposalStore
//!                       └───────────┴───────┬───────┘
//!                                        LcdClient
//!                               │                       │
//!                               └──────► Event Bus ◄────┘
//! ```

pub mod notifications;
pub mod runtime;

pub use notifications::spawn_notification_logger;
pub use runtime::{build_lcd_runtime, LcdRuntime, WalletRuntime};
