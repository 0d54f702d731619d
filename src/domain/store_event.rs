//! Change notifications emitted by the event store.
//!
//! Every successful mutation of [`super::EventStore`] publishes a
//! [`StoreEvent`] through the [`super::EventBus`]. Consumers use them to
//! know when to re-aggregate and re-render.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{HolidayId, RecordId, RecordStatus, UserId};

/// Domain event emitted after every store mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A record was created.
    RecordAdded {
        /// New record id.
        record_id: RecordId,
        /// Owner of the record.
        user_id: UserId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A record's fields or time range changed.
    RecordUpdated {
        /// Record id.
        record_id: RecordId,
        /// Owner of the record after the update.
        user_id: UserId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A record's approval state changed.
    StatusChanged {
        /// Record id.
        record_id: RecordId,
        /// Owner of the record.
        user_id: UserId,
        /// New status.
        status: RecordStatus,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A record was deleted.
    RecordRemoved {
        /// Former record id.
        record_id: RecordId,
        /// Former owner.
        user_id: UserId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A user joined the team.
    UserAdded {
        /// New user id.
        user_id: UserId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A user's used-hours counter was overwritten.
    UsedHoursChanged {
        /// User id.
        user_id: UserId,
        /// New used-hours value.
        used_pto_hours: u32,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A holiday was added.
    HolidayAdded {
        /// Holiday id.
        holiday_id: HolidayId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A holiday's name, date or recurrence changed.
    HolidayUpdated {
        /// Holiday id.
        holiday_id: HolidayId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A holiday was removed.
    HolidayRemoved {
        /// Holiday id.
        holiday_id: HolidayId,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl StoreEvent {
    /// Returns the user the event concerns, if any.
    ///
    /// Holiday events are team-wide and return `None`.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        match self {
            Self::RecordAdded { user_id, .. }
            | Self::RecordUpdated { user_id, .. }
            | Self::StatusChanged { user_id, .. }
            | Self::RecordRemoved { user_id, .. }
            | Self::UserAdded { user_id, .. }
            | Self::UsedHoursChanged { user_id, .. } => Some(*user_id),
            Self::HolidayAdded { .. }
            | Self::HolidayUpdated { .. }
            | Self::HolidayRemoved { .. } => None,
        }
    }

    /// Returns the record the event concerns, if any.
    #[must_use]
    pub const fn record_id(&self) -> Option<RecordId> {
        match self {
            Self::RecordAdded { record_id, .. }
            | Self::RecordUpdated { record_id, .. }
            | Self::StatusChanged { record_id, .. }
            | Self::RecordRemoved { record_id, .. } => Some(*record_id),
            _ => None,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::RecordAdded { .. } => "record_added",
            Self::RecordUpdated { .. } => "record_updated",
            Self::StatusChanged { .. } => "status_changed",
            Self::RecordRemoved { .. } => "record_removed",
            Self::UserAdded { .. } => "user_added",
            Self::UsedHoursChanged { .. } => "used_hours_changed",
            Self::HolidayAdded { .. } => "holiday_added",
            Self::HolidayUpdated { .. } => "holiday_updated",
            Self::HolidayRemoved { .. } => "holiday_removed",
        }
    }
}
