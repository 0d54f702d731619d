//! In-memory store for records, users and holidays.
//!
//! [`EventStore`] is the single owner of all calendar state. Its `&mut self`
//! methods are the only write path; readers take `&EventStore` or follow
//! changes through a [`StoreSubscription`].

use chrono::{NaiveDate, Utc};

use super::subscription::{StoreSubscription, SubscriptionFilter};
use super::{
    EventBus, Holiday, HolidayId, NewRecord, PtoRecord, RecordId, RecordStatus, StoreEvent,
    TimeRange, User, UserId,
};
use crate::error::{PlannerError, PlannerResult};

/// Central store for the planner session.
///
/// Records keep insertion order. Lookups by an unknown id are silent
/// no-ops: mutators return `false` / `None` and publish nothing.
#[derive(Debug)]
pub struct EventStore {
    records: Vec<PtoRecord>,
    users: Vec<User>,
    holidays: Vec<Holiday>,
    event_bus: EventBus,
}

impl EventStore {
    /// Creates an empty store publishing on `event_bus`.
    #[must_use]
    pub fn new(event_bus: EventBus) -> Self {
        Self {
            records: Vec::new(),
            users: Vec::new(),
            holidays: Vec::new(),
            event_bus,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Subscribes to future changes matching `filter`.
    #[must_use]
    pub fn subscribe(&self, filter: SubscriptionFilter) -> StoreSubscription {
        self.event_bus.subscribe_filtered(filter)
    }

    // ---------------------------
    // Records
    // ---------------------------

    /// Inserts a new record and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidRange`] if `end < start`.
    pub fn add_record(&mut self, new: NewRecord) -> PlannerResult<RecordId> {
        TimeRange::new(new.start, new.end)?;
        let record_id = RecordId::new();
        let user_id = new.user_id;
        self.records.push(new.into_record(record_id));

        self.event_bus.publish(StoreEvent::RecordAdded {
            record_id,
            user_id,
            timestamp: Utc::now(),
        });
        tracing::info!(%record_id, %user_id, "record added");
        Ok(record_id)
    }

    /// Replaces the record with the same id.
    ///
    /// Returns `Ok(false)` if no such record exists.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidRange`] if `end < start`.
    pub fn update_record(&mut self, record: PtoRecord) -> PlannerResult<bool> {
        record.range()?;
        let Some(slot) = self.records.iter_mut().find(|r| r.id == record.id) else {
            tracing::debug!(record_id = %record.id, "update ignored: unknown record");
            return Ok(false);
        };
        let record_id = record.id;
        let user_id = record.user_id;
        *slot = record;

        self.event_bus.publish(StoreEvent::RecordUpdated {
            record_id,
            user_id,
            timestamp: Utc::now(),
        });
        tracing::debug!(%record_id, "record updated");
        Ok(true)
    }

    /// Moves a record to a new time range.
    ///
    /// Returns `false` if no such record exists or the range is unchanged.
    pub fn reschedule(&mut self, record_id: RecordId, range: TimeRange) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.id == record_id) else {
            return false;
        };
        if record.start == range.start() && record.end == range.end() {
            return false;
        }
        record.start = range.start();
        record.end = range.end();
        let user_id = record.user_id;

        self.event_bus.publish(StoreEvent::RecordUpdated {
            record_id,
            user_id,
            timestamp: Utc::now(),
        });
        tracing::debug!(%record_id, start = %range.start(), end = %range.end(), "record rescheduled");
        true
    }

    /// Changes a record's approval state.
    ///
    /// Returns `false` if no such record exists.
    pub fn set_status(&mut self, record_id: RecordId, status: RecordStatus) -> bool {
        let Some(record) = self.records.iter_mut().find(|r| r.id == record_id) else {
            return false;
        };
        record.status = status;
        let user_id = record.user_id;

        self.event_bus.publish(StoreEvent::StatusChanged {
            record_id,
            user_id,
            status,
            timestamp: Utc::now(),
        });
        tracing::info!(%record_id, %status, "record status changed");
        true
    }

    /// Removes a record, returning it if it existed.
    pub fn remove_record(&mut self, record_id: RecordId) -> Option<PtoRecord> {
        let index = self.records.iter().position(|r| r.id == record_id)?;
        let record = self.records.remove(index);

        self.event_bus.publish(StoreEvent::RecordRemoved {
            record_id,
            user_id: record.user_id,
            timestamp: Utc::now(),
        });
        tracing::info!(%record_id, "record removed");
        Some(record)
    }

    /// Looks up a record by id.
    #[must_use]
    pub fn record(&self, record_id: RecordId) -> Option<&PtoRecord> {
        self.records.iter().find(|r| r.id == record_id)
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[PtoRecord] {
        &self.records
    }

    /// Records owned by `user_id`.
    pub fn records_for_user(&self, user_id: UserId) -> impl Iterator<Item = &PtoRecord> {
        self.records.iter().filter(move |r| r.user_id == user_id)
    }

    /// Records touching `date` (UTC).
    pub fn records_on(&self, date: NaiveDate) -> impl Iterator<Item = &PtoRecord> {
        self.records.iter().filter(move |r| r.touches(date))
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // ---------------------------
    // Users
    // ---------------------------

    /// Adds a user and returns its id.
    pub fn add_user(&mut self, user: User) -> UserId {
        let user_id = user.id;
        self.users.push(user);

        self.event_bus.publish(StoreEvent::UserAdded {
            user_id,
            timestamp: Utc::now(),
        });
        tracing::info!(%user_id, "user added");
        user_id
    }

    /// Looks up a user by id.
    #[must_use]
    pub fn user(&self, user_id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == user_id)
    }

    /// All users in insertion order.
    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Overwrites the denormalized used-hours counter of a user.
    ///
    /// Returns `false` if no such user exists.
    pub fn set_used_hours(&mut self, user_id: UserId, used_pto_hours: u32) -> bool {
        let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) else {
            return false;
        };
        user.used_pto_hours = used_pto_hours;

        self.event_bus.publish(StoreEvent::UsedHoursChanged {
            user_id,
            used_pto_hours,
            timestamp: Utc::now(),
        });
        true
    }

    /// Resolves the owner of a submission.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::UnknownUser`] if no such user exists.
    pub fn require_user(&self, user_id: UserId) -> PlannerResult<&User> {
        self.user(user_id).ok_or(PlannerError::UnknownUser(user_id))
    }

    // ---------------------------
    // Holidays
    // ---------------------------

    /// Adds a holiday and returns its id.
    pub fn add_holiday(&mut self, holiday: Holiday) -> HolidayId {
        let holiday_id = holiday.id;
        self.holidays.push(holiday);

        self.event_bus.publish(StoreEvent::HolidayAdded {
            holiday_id,
            timestamp: Utc::now(),
        });
        holiday_id
    }

    /// Replaces the holiday with the same id.
    ///
    /// Returns `false` if no such holiday exists.
    pub fn update_holiday(&mut self, holiday: Holiday) -> bool {
        let Some(slot) = self.holidays.iter_mut().find(|h| h.id == holiday.id) else {
            return false;
        };
        let holiday_id = holiday.id;
        *slot = holiday;

        self.event_bus.publish(StoreEvent::HolidayUpdated {
            holiday_id,
            timestamp: Utc::now(),
        });
        tracing::debug!(%holiday_id, "holiday updated");
        true
    }

    /// Removes a holiday, returning it if it existed.
    pub fn remove_holiday(&mut self, holiday_id: HolidayId) -> Option<Holiday> {
        let index = self.holidays.iter().position(|h| h.id == holiday_id)?;
        let holiday = self.holidays.remove(index);

        self.event_bus.publish(StoreEvent::HolidayRemoved {
            holiday_id,
            timestamp: Utc::now(),
        });
        Some(holiday)
    }

    /// All holidays in insertion order.
    #[must_use]
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    /// Returns `true` if any holiday falls on `date`.
    #[must_use]
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.iter().any(|h| h.applies_on(date))
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(EventBus::default())
    }
}
