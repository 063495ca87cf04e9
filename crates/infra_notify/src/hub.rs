//! Broadcast hub
//!
//! One `tokio::sync::broadcast` channel fans committed change events out
//! to every connected subscriber. The buffer is bounded and lossy: a
//! subscriber that falls behind skips the missed events and keeps
//! receiving, and publishing never blocks or fails the committed mutation.

use tokio::sync::broadcast;
use tracing::debug;

use domain_lifecycle::{ChangeEvent, ChangeNotifier};

const DEFAULT_CAPACITY: usize = 256;

/// Fan-out hub for lifecycle change events
pub struct ChangeHub {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeHub {
    /// Creates a hub with the default buffer capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a hub with an explicit per-subscriber buffer capacity
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Opens a new subscription
    ///
    /// The receiver only sees events published after this call; there is
    /// no replay of earlier events.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Number of currently connected subscribers, for diagnostics
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for ChangeHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeNotifier for ChangeHub {
    fn publish(&self, event: ChangeEvent) {
        // A send error only means nobody is listening
        match self.sender.send(event) {
            Ok(receivers) => debug!(receivers, "change event published"),
            Err(_) => debug!("change event dropped, no subscribers"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::ItemId;

    fn deleted(item_id: ItemId) -> ChangeEvent {
        ChangeEvent::ItemDeleted { item_id }
    }

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let hub = ChangeHub::new();
        let mut rx = hub.subscribe();

        let id = ItemId::new();
        hub.publish(deleted(id));

        let event = rx.recv().await.unwrap();
        assert_eq!(event.item_id(), id);
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_a_no_op() {
        let hub = ChangeHub::new();
        hub.publish(deleted(ItemId::new()));
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_late_subscriber_misses_earlier_events() {
        let hub = ChangeHub::new();
        hub.publish(deleted(ItemId::new()));

        let mut rx = hub.subscribe();
        let later = ItemId::new();
        hub.publish(deleted(later));

        // Only the event published after subscribing arrives
        assert_eq!(rx.recv().await.unwrap().item_id(), later);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order() {
        let hub = ChangeHub::new();
        let mut rx = hub.subscribe();

        let ids: Vec<ItemId> = (0..5).map(|_| ItemId::new()).collect();
        for id in &ids {
            hub.publish(deleted(*id));
        }
        for id in &ids {
            assert_eq!(rx.recv().await.unwrap().item_id(), *id);
        }
    }

    #[tokio::test]
    async fn test_dropped_subscriber_does_not_affect_others() {
        let hub = ChangeHub::new();
        let rx_dead = hub.subscribe();
        let mut rx_live = hub.subscribe();
        drop(rx_dead);

        let id = ItemId::new();
        hub.publish(deleted(id));
        assert_eq!(rx_live.recv().await.unwrap().item_id(), id);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_skips_missed_events() {
        let hub = ChangeHub::with_capacity(2);
        let mut rx = hub.subscribe();

        for _ in 0..4 {
            hub.publish(deleted(ItemId::new()));
        }

        // The first recv reports the lag; the channel then resumes from
        // the oldest retained event.
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
        assert!(rx.recv().await.is_ok());
    }
}
