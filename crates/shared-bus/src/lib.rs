//! # Shared Bus - Event Bus for Wallet Modules
//!
//! Modules never call the view layer directly. Anything the user should see
//! (error toasts, "history loaded", "deposit submitted") is published here
//! and picked up by whoever subscribes.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ Transactions │                    │  View layer  │
//! │   Deposits   │    publish()       │  (toasts,    │
//! │              │ ──────┐            │   banners)   │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, Notification, WalletEvent, WalletModule};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::{EventStream, EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before the slowest one lags.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
