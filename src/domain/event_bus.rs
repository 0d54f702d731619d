//! Fan-out of store changes to any number of readers.
//!
//! The store publishes a [`StoreEvent`] after each mutation; views hold a
//! [`StoreSubscription`] and re-aggregate when something they show changed.

use tokio::sync::broadcast;

use super::StoreEvent;
use super::subscription::{StoreSubscription, SubscriptionFilter};

/// Broadcast sender for [`StoreEvent`]s, shared by cloning.
///
/// `publish` never blocks, so single-threaded code can call it directly.
/// Readers slower than `capacity` events lose the oldest ones and are told
/// how many they missed.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` undelivered events per
    /// reader (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Sends `event` to every live reader and returns how many there were.
    ///
    /// With nobody listening the event is dropped and `0` is returned.
    pub fn publish(&self, event: StoreEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Unfiltered receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Receiver that only yields events passing `filter`.
    #[must_use]
    pub fn subscribe_filtered(&self, filter: SubscriptionFilter) -> StoreSubscription {
        StoreSubscription::new(self.sender.subscribe(), filter)
    }

    /// Number of live readers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
