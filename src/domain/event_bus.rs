//! Broadcast channel for live attendance messages.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Every
//! pipeline decision publishes a [`LiveEvent`] through the bus, and all
//! WebSocket connections subscribe to receive filtered messages. A slow
//! or disconnected subscriber never blocks event processing: when the
//! ring buffer is full, the oldest messages are dropped for lagging
//! receivers.

use tokio::sync::broadcast;

use super::LiveEvent;

/// Broadcast bus for [`LiveEvent`]s.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<LiveEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes a message to all subscribers.
    ///
    /// Returns the number of receivers that received the message.
    /// If there are no active receivers, the message is silently dropped.
    pub fn publish(&self, event: LiveEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver that will receive all future messages.
    ///
    /// Each WebSocket connection should call this once on connect.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::event::Direction;
    use chrono::Utc;

    fn make_event() -> LiveEvent {
        LiveEvent::Swipe {
            student_external_id: "EXT-1".to_string(),
            hall_external_id: "hall-1".to_string(),
            direction: Direction::In,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn publish_without_receivers_returns_zero() {
        let bus = EventBus::new(100);
        let count = bus.publish(make_event());
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn subscriber_receives_event() {
        let bus = EventBus::new(100);
        let mut rx = bus.subscribe();

        bus.publish(make_event());

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected to receive event");
        };
        assert_eq!(event.event_type_str(), "attendance-event");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(100);
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let count = bus.publish(make_event());
        assert_eq!(count, 2);

        let e1 = rx1.recv().await;
        let e2 = rx2.recv().await;
        let Ok(e1) = e1 else {
            panic!("rx1 failed");
        };
        let Ok(e2) = e2 else {
            panic!("rx2 failed");
        };
        assert_eq!(e1.event_type_str(), e2.event_type_str());
    }

    #[test]
    fn receiver_count_tracks_subscribers() {
        let bus = EventBus::new(100);
        assert_eq!(bus.receiver_count(), 0);

        let _rx1 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 1);

        let _rx2 = bus.subscribe();
        assert_eq!(bus.receiver_count(), 2);

        drop(_rx1);
        assert_eq!(bus.receiver_count(), 1);
    }

    #[tokio::test]
    async fn full_channel_drops_oldest_for_laggards() {
        let bus = EventBus::new(1);
        let mut rx = bus.subscribe();

        bus.publish(make_event());
        bus.publish(make_event());

        // The first message was dropped; the receiver observes a lag.
        let first = rx.recv().await;
        assert!(matches!(
            first,
            Err(broadcast::error::RecvError::Lagged(_))
        ));
        let second = rx.recv().await;
        assert!(second.is_ok());
    }
}
