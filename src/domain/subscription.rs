//! Filtered, non-blocking subscriptions to store events.
//!
//! A [`StoreSubscription`] pairs a broadcast receiver with a
//! [`SubscriptionFilter`] so that a view showing one person's calendar only
//! wakes up for that person's changes.

use std::collections::HashSet;

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use super::{StoreEvent, UserId};

/// Set of users a consumer is interested in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    /// Explicitly followed users. Ignored when `follow_all` is set.
    user_ids: HashSet<UserId>,
    /// Whether every event passes the filter.
    follow_all: bool,
}

impl SubscriptionFilter {
    /// A filter that matches nothing until users are added.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A wildcard filter that matches every event.
    #[must_use]
    pub fn all() -> Self {
        Self {
            user_ids: HashSet::new(),
            follow_all: true,
        }
    }

    /// A filter following the given users.
    #[must_use]
    pub fn users(ids: &[UserId]) -> Self {
        let mut filter = Self::new();
        filter.follow(ids);
        filter
    }

    /// Adds users to the filter.
    pub fn follow(&mut self, ids: &[UserId]) {
        self.user_ids.extend(ids.iter().copied());
    }

    /// Removes users from the filter.
    pub fn unfollow(&mut self, ids: &[UserId]) {
        for id in ids {
            self.user_ids.remove(id);
        }
    }

    /// Returns `true` if the event passes the filter.
    ///
    /// Team-wide events (holidays) reach every subscriber.
    #[must_use]
    pub fn matches(&self, event: &StoreEvent) -> bool {
        if self.follow_all {
            return true;
        }
        event
            .user_id()
            .is_none_or(|user_id| self.user_ids.contains(&user_id))
    }

    /// Returns the number of explicitly followed users.
    #[must_use]
    pub fn count(&self) -> usize {
        self.user_ids.len()
    }

    /// Returns `true` if the wildcard is active.
    #[must_use]
    pub const fn is_follow_all(&self) -> bool {
        self.follow_all
    }
}

/// A filtered receiver of [`StoreEvent`]s.
#[derive(Debug)]
pub struct StoreSubscription {
    receiver: broadcast::Receiver<StoreEvent>,
    filter: SubscriptionFilter,
}

impl StoreSubscription {
    /// Wraps a receiver with a filter.
    #[must_use]
    pub fn new(receiver: broadcast::Receiver<StoreEvent>, filter: SubscriptionFilter) -> Self {
        Self { receiver, filter }
    }

    /// Mutable access to the filter, e.g. when the viewed user changes.
    pub fn filter_mut(&mut self) -> &mut SubscriptionFilter {
        &mut self.filter
    }

    /// Returns every pending event that passes the filter without blocking.
    ///
    /// If the receiver fell behind, the dropped events are skipped and a
    /// warning is logged.
    pub fn drain(&mut self) -> Vec<StoreEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.filter.matches(&event) {
                        events.push(event);
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "store subscription lagged; events dropped");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        events
    }

    /// Waits for the next event that passes the filter.
    ///
    /// Returns `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<StoreEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "store subscription lagged; events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
