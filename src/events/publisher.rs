use serde_json::Value;
use tokio::sync::broadcast;

use crate::constants::DEFAULT_EVENT_CHANNEL_CAPACITY;

/// Fan-out of garage, service and runner lifecycle events.
///
/// Publishing never fails: an event sent while nobody is subscribed is
/// simply dropped, and slow subscribers see `RecvError::Lagged` on their
/// side rather than blocking the publisher.
#[derive(Debug, Clone)]
pub struct EventPublisher {
    sender: broadcast::Sender<PublishedEvent>,
}

#[derive(Debug, Clone)]
pub struct PublishedEvent {
    pub name: String,
    pub context: Value,
    pub published_at: chrono::DateTime<chrono::Utc>,
}

impl EventPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Send an event to every current subscriber; returns how many received it.
    ///
    /// Non-blocking, so callers may publish while holding a lock.
    pub fn publish(&self, name: impl Into<String>, context: Value) -> usize {
        let event = PublishedEvent {
            name: name.into(),
            context,
            published_at: chrono::Utc::now(),
        };
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PublishedEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CHANNEL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_publish_without_subscribers_is_dropped() {
        let publisher = EventPublisher::new(4);
        assert_eq!(publisher.publish("garage.record_added", json!({})), 0);
    }

    #[tokio::test]
    async fn test_every_subscriber_receives_event() {
        let publisher = EventPublisher::default();
        let mut first = publisher.subscribe();
        let mut second = publisher.subscribe();

        let delivered = publisher.publish("bicycle.added", json!({"brand": "Trek"}));
        assert_eq!(delivered, 2);

        let event = first.recv().await.unwrap();
        assert_eq!(event.name, "bicycle.added");
        assert_eq!(event.context["brand"], "Trek");
        assert_eq!(second.recv().await.unwrap().name, "bicycle.added");
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let publisher = EventPublisher::new(0);
        let mut receiver = publisher.subscribe();
        assert_eq!(publisher.publish("run.started", json!({})), 1);
        assert_eq!(receiver.try_recv().unwrap().name, "run.started");
    }
}
