//! Notification sink.
//!
//! Without a UI, user notifications are written to the log.

use std::sync::Arc;

use shared_bus::{EventFilter, EventTopic, InMemoryEventBus, WalletEvent};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::warn;

/// Log every notification published on `bus` until the bus is dropped.
pub fn spawn_notification_logger(bus: &Arc<InMemoryEventBus>) -> JoinHandle<usize> {
    let mut stream = bus.event_stream(EventFilter::topics(vec![EventTopic::Notifications]));
    tokio::spawn(async move {
        let mut shown = 0;
        while let Some(event) = stream.next().await {
            if let WalletEvent::ErrorNotified {
                source,
                notification,
            } = event
            {
                warn!(
                    source = ?source,
                    title = %notification.title,
                    "{}",
                    notification.body
                );
                shown += 1;
            }
        }
        shown
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_bus::{EventPublisher, Notification, WalletModule};

    #[tokio::test]
    async fn test_logger_counts_notifications() {
        let bus = Arc::new(InMemoryEventBus::new());
        let handle = spawn_notification_logger(&bus);

        bus.publish(WalletEvent::ErrorNotified {
            source: WalletModule::Deposits,
            notification: Notification::new("Error fetching deposits on proposals", "timeout"),
        })
        .await;
        bus.publish(WalletEvent::SessionReset).await;
        tokio::task::yield_now().await;
        drop(bus);

        assert_eq!(handle.await.unwrap(), 1);
    }
}
