//! Domain layer: identifiers, records, the event store and its
//! notification system.
//!
//! This module contains the planner's owned state: PTO records, users and
//! holidays held by [`EventStore`], plus the [`EventBus`] that broadcasts
//! every mutation to [`StoreSubscription`]s.

pub mod event_bus;
pub mod event_store;
pub mod ids;
pub mod record;
pub mod seed;
pub mod store_event;
pub mod subscription;

pub use event_bus::EventBus;
pub use event_store::EventStore;
pub use ids::{HolidayId, RecordId, UserId};
pub use record::{
    Holiday, NewRecord, PtoRecord, RecordCategory, RecordStatus, TimeRange, User,
};
pub use store_event::StoreEvent;
pub use subscription::{StoreSubscription, SubscriptionFilter};
