//! # Event Publisher
//!
//! Publishing side of the bus. Modules hold it as `Arc<dyn EventPublisher>`.

use crate::events::{EventFilter, EventTopic, WalletEvent};
use crate::subscriber::{EventStream, EventSubscriber, Subscription, TopicListeners};
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

/// Trait for publishing events to the bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event to the bus.
    ///
    /// Returns the number of live subscribers the event was handed to,
    /// before filtering.
    async fn publish(&self, event: WalletEvent) -> usize;

    /// Total events published so far.
    fn events_published(&self) -> u64;
}

/// In-memory event bus over `tokio::sync::broadcast`.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<WalletEvent>,
    listeners: Arc<TopicListeners>,
    events_published: AtomicU64,
    capacity: usize,
}

impl InMemoryEventBus {
    /// Bus with [`DEFAULT_CHANNEL_CAPACITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Bus buffering up to `capacity` events per subscriber.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            listeners: Arc::new(TopicListeners::default()),
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, sources = ?filter.sources, "New subscription");
        Subscription::new(self.sender.subscribe(), filter, self.listeners.clone())
    }

    /// Subscribe as a stream.
    #[must_use]
    pub fn event_stream(&self, filter: EventFilter) -> EventStream {
        EventStream::new(self.subscribe(filter))
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Subscriptions whose filter lets `topic` through.
    #[must_use]
    pub fn listening_to(&self, topic: EventTopic) -> usize {
        self.listeners.listening_to(topic)
    }

    /// Channel capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSubscriber for InMemoryEventBus {
    fn subscribe(&self, filter: EventFilter) -> Subscription {
        InMemoryEventBus::subscribe(self, filter)
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: WalletEvent) -> usize {
        let topic = event.topic();
        let source = event.source_module();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        // A notification nobody listens to never reaches the user.
        if let WalletEvent::ErrorNotified { notification, .. } = &event {
            if self.listening_to(EventTopic::Notifications) == 0 {
                warn!(
                    source = ?source,
                    title = %notification.title,
                    body = %notification.body,
                    "Notification has no listener"
                );
            }
        }

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(topic = ?topic, source = ?source, receivers, "Event published");
                receivers
            }
            Err(_) => {
                trace!(topic = ?topic, source = ?source, "Event dropped (no receivers)");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
