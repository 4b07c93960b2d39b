//! In-process [`NotificationBus`] over a tokio broadcast channel.

use tokio::sync::broadcast;
use tracing::debug;

use crate::model::ComplaintEvent;
use crate::traits::NotificationBus;

pub const DEFAULT_CAPACITY: usize = 256;

/// Fans complaint events out to every live subscriber.
///
/// Receivers only see events sent after they subscribed. A receiver that
/// falls more than `capacity` events behind loses the oldest ones.
#[derive(Debug, Clone)]
pub struct BroadcastBus {
    sender: broadcast::Sender<ComplaintEvent>,
}

impl Default for BroadcastBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BroadcastBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ComplaintEvent> {
        self.sender.subscribe()
    }

    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl NotificationBus for BroadcastBus {
    fn broadcast(&self, event: ComplaintEvent) {
        let name = event.name();
        let id = event.complaint().id;
        match self.sender.send(event) {
            Ok(observers) => debug!(event = name, %id, observers, "broadcast complaint event"),
            Err(_) => debug!(event = name, %id, "no observers connected, event dropped"),
        }
    }
}
