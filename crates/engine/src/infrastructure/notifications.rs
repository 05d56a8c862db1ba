//! In-process push channel for state transitions.

use skirmish_domain::DomainEvent;
use tokio::sync::broadcast;

use crate::infrastructure::ports::NotificationPort;

/// Fans every published event out to all subscribers.
///
/// Subscribers filter by location themselves. A slow subscriber that falls
/// more than `capacity` events behind loses the oldest ones.
pub struct BroadcastNotifier {
    sender: broadcast::Sender<DomainEvent>,
}

impl BroadcastNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl NotificationPort for BroadcastNotifier {
    fn publish(&self, event: DomainEvent) {
        let event_type = event.event_type();
        let location_id = event.location_id();
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!(event_type, location_id = %location_id, receivers, "Published notification");
            }
            Err(_) => {
                tracing::trace!(event_type, location_id = %location_id, "No subscribers for notification");
            }
        }
    }
}
