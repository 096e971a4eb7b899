//! # Wallet Events
//!
//! Every event that flows through the shared bus.

use serde::{Deserialize, Serialize};
use shared_types::ProposalId;

/// Module that emitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalletModule {
    /// Transaction history.
    Transactions,
    /// Proposal deposits.
    Deposits,
    /// Runtime wiring (session, connection).
    Runtime,
}

/// A user-facing notification: static title, raw message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Short static title.
    pub title: String,
    /// Message body, usually the raw error message.
    pub body: String,
}

impl Notification {
    /// Build a notification.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WalletEvent {
    // =========================================================================
    // NOTIFICATIONS
    // =========================================================================
    /// An action failed and the user should be told.
    ErrorNotified {
        /// Module whose action failed.
        source: WalletModule,
        /// What to show.
        notification: Notification,
    },

    // =========================================================================
    // TRANSACTIONS
    // =========================================================================
    /// All three history categories were fetched and committed.
    TransactionsLoaded {
        /// Staking records after dedup.
        staking: usize,
        /// Governance records after dedup.
        governance: usize,
        /// Wallet records after dedup.
        wallet: usize,
    },

    /// Block times were written onto the history.
    TransactionTimesResolved {
        /// Distinct heights looked up.
        heights: usize,
    },

    // =========================================================================
    // DEPOSITS
    // =========================================================================
    /// Deposits for a proposal were replaced.
    DepositsUpdated {
        /// The proposal.
        proposal_id: ProposalId,
        /// Number of deposits now stored.
        count: usize,
    },

    /// A deposit transaction was accepted by the node.
    DepositSubmitted {
        /// The proposal deposited on.
        proposal_id: ProposalId,
    },

    // =========================================================================
    // RUNTIME
    // =========================================================================
    /// Per-account state was cleared.
    SessionReset,

    /// The node connection went up or down.
    ConnectionChanged {
        /// New connection state.
        connected: bool,
    },
}

impl WalletEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ErrorNotified { .. } => EventTopic::Notifications,
            Self::TransactionsLoaded { .. } | Self::TransactionTimesResolved { .. } => {
                EventTopic::Transactions
            }
            Self::DepositsUpdated { .. } | Self::DepositSubmitted { .. } => EventTopic::Deposits,
            Self::SessionReset | Self::ConnectionChanged { .. } => EventTopic::Session,
        }
    }

    /// Get the originating module.
    #[must_use]
    pub fn source_module(&self) -> WalletModule {
        match self {
            Self::ErrorNotified { source, .. } => *source,
            Self::TransactionsLoaded { .. } | Self::TransactionTimesResolved { .. } => {
                WalletModule::Transactions
            }
            Self::DepositsUpdated { .. } | Self::DepositSubmitted { .. } => WalletModule::Deposits,
            Self::SessionReset | Self::ConnectionChanged { .. } => WalletModule::Runtime,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// User-facing notifications.
    Notifications,
    /// Transaction history events.
    Transactions,
    /// Deposit events.
    Deposits,
    /// Session and connection events.
    Session,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source modules to include. Empty means all sources.
    pub sources: Vec<WalletModule>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            sources: Vec::new(),
        }
    }

    /// Create a filter for events from specific modules.
    #[must_use]
    pub fn from_modules(sources: Vec<WalletModule>) -> Self {
        Self {
            topics: Vec::new(),
            sources,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &WalletEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.sources.is_empty() || self.sources.contains(&event.source_module());

        topic_match && source_match
    }
}
