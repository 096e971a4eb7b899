//! # Event Subscriber
//!
//! Subscriptions register the topics they listen to, so the bus can tell
//! whether anyone will see a notification before it is sent.

use crate::events::{EventFilter, EventTopic, WalletEvent};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::Stream;
use tracing::debug;

/// Errors from subscription operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// The event bus was closed.
    #[error("Event bus closed")]
    Closed,
}

/// Anything that hands out subscriptions.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe to events matching a filter.
    fn subscribe(&self, filter: EventFilter) -> Subscription;
}

/// Live subscriber count per topic. A filter without topics is counted
/// under [`EventTopic::All`].
#[derive(Debug, Default)]
pub(crate) struct TopicListeners {
    counts: Mutex<HashMap<EventTopic, usize>>,
}

impl TopicListeners {
    fn keys(filter: &EventFilter) -> Vec<EventTopic> {
        if filter.topics.is_empty() || filter.topics.contains(&EventTopic::All) {
            vec![EventTopic::All]
        } else {
            let mut keys = Vec::with_capacity(filter.topics.len());
            for topic in &filter.topics {
                if !keys.contains(topic) {
                    keys.push(*topic);
                }
            }
            keys
        }
    }

    fn register(&self, keys: &[EventTopic]) {
        let mut counts = self.counts.lock();
        for key in keys {
            *counts.entry(*key).or_insert(0) += 1;
        }
    }

    fn release(&self, keys: &[EventTopic]) {
        let mut counts = self.counts.lock();
        for key in keys {
            if let Some(count) = counts.get_mut(key) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    counts.remove(key);
                }
            }
        }
    }

    /// Subscribers whose topics include `topic`.
    pub(crate) fn listening_to(&self, topic: EventTopic) -> usize {
        let counts = self.counts.lock();
        let all = counts.get(&EventTopic::All).copied().unwrap_or(0);
        if topic == EventTopic::All {
            return all;
        }
        all + counts.get(&topic).copied().unwrap_or(0)
    }
}

/// A subscription handle for receiving events.
///
/// Dropping it unregisters its topics.
pub struct Subscription {
    receiver: broadcast::Receiver<WalletEvent>,
    filter: EventFilter,
    listeners: Arc<TopicListeners>,
    keys: Vec<EventTopic>,
}

impl Subscription {
    pub(crate) fn new(
        receiver: broadcast::Receiver<WalletEvent>,
        filter: EventFilter,
        listeners: Arc<TopicListeners>,
    ) -> Self {
        let keys = TopicListeners::keys(&filter);
        listeners.register(&keys);
        Self {
            receiver,
            filter,
            listeners,
            keys,
        }
    }

    /// Receive the next event that matches the filter.
    ///
    /// Returns `None` once the bus is dropped. A lagging subscriber skips
    /// the events it missed and keeps going.
    pub async fn recv(&mut self) -> Option<WalletEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    debug!(missed, "Subscriber lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next buffered event that matches the filter, without waiting.
    ///
    /// `Ok(None)` when nothing matching is buffered.
    pub fn try_recv(&mut self) -> Result<Option<WalletEvent>, SubscriptionError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.filter.matches(&event) => return Ok(Some(event)),
                Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => {}
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => {
                    return Err(SubscriptionError::Closed)
                }
            }
        }
    }

    /// Drain every matching event that is already buffered.
    pub fn drain(&mut self) -> Vec<WalletEvent> {
        std::iter::from_fn(|| self.try_recv().ok().flatten()).collect()
    }

    /// The filter this subscription was created with.
    #[must_use]
    pub fn filter(&self) -> &EventFilter {
        &self.filter
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.listeners.release(&self.keys);
        debug!(topics = ?self.keys, "Subscription dropped");
    }
}

/// A subscription as a `tokio_stream::Stream`.
pub struct EventStream {
    inner: BroadcastStream<WalletEvent>,
    // Keeps the topics registered while the stream lives.
    subscription: Subscription,
}

impl EventStream {
    /// Turn `subscription` into a stream.
    #[must_use]
    pub fn new(mut subscription: Subscription) -> Self {
        // The stream takes over the live receiver.
        let (_closed, placeholder) = broadcast::channel(1);
        let receiver = std::mem::replace(&mut subscription.receiver, placeholder);
        Self {
            inner: BroadcastStream::new(receiver),
            subscription,
        }
    }

    /// The filter this stream was created with.
    ///
    /// Not named `filter` so it stays callable next to `StreamExt::filter`.
    #[must_use]
    pub fn subscription_filter(&self) -> &EventFilter {
        self.subscription.filter()
    }
}

impl Stream for EventStream {
    type Item = WalletEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => {
                    if self.subscription.filter.matches(&event) {
                        return Poll::Ready(Some(event));
                    }
                }
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(missed)))) => {
                    debug!(missed, "Stream lagged, events dropped");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
