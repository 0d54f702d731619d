//! PTO records, users and holidays.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use super::{HolidayId, RecordId, UserId};
use crate::error::{PlannerError, PlannerResult};

/// Approval state of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    /// Submitted, awaiting a decision.
    Pending,
    /// Approved by a manager.
    Approved,
    /// Rejected by a manager.
    Rejected,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for RecordStatus {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(PlannerError::InvalidStatus(s.to_string())),
        }
    }
}

/// Kind of leave a record represents.
///
/// `Auto` records come from accepted suggestions, `Manual` ones were placed
/// by hand on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordCategory {
    /// Annual vacation.
    Vacation,
    /// Personal day or appointment.
    Personal,
    /// Accepted from a slot suggestion.
    Auto,
    /// Placed manually.
    Manual,
}

impl fmt::Display for RecordCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vacation => write!(f, "vacation"),
            Self::Personal => write!(f, "personal"),
            Self::Auto => write!(f, "auto"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

impl FromStr for RecordCategory {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vacation" => Ok(Self::Vacation),
            "personal" => Ok(Self::Personal),
            "auto" => Ok(Self::Auto),
            "manual" => Ok(Self::Manual),
            _ => Err(PlannerError::InvalidCategory(s.to_string())),
        }
    }
}

/// A validated time range with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a range, rejecting inverted bounds.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidRange`] if `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> PlannerResult<Self> {
        if end < start {
            return Err(PlannerError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range from a start and a non-negative duration.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidRange`] if the duration is negative.
    pub fn starting_at(start: DateTime<Utc>, duration: TimeDelta) -> PlannerResult<Self> {
        Self::new(start, start + duration)
    }

    /// Inclusive start.
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// Exclusive end.
    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Length of the range.
    #[must_use]
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Same duration, moved to begin at `start`.
    #[must_use]
    pub fn with_start(&self, start: DateTime<Utc>) -> Self {
        Self {
            start,
            end: start + self.duration(),
        }
    }

    /// Same start, with the given duration. Negative durations collapse to
    /// an empty range.
    #[must_use]
    pub fn with_duration(&self, duration: TimeDelta) -> Self {
        Self {
            start: self.start,
            end: self.start + duration.max(TimeDelta::zero()),
        }
    }
}

/// A record as submitted, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    /// Owning user.
    pub user_id: UserId,
    /// Display name of the owner at submission time.
    pub user_name: String,
    /// Optional short label shown on the grid.
    pub title: Option<String>,
    /// Optional free-text note.
    pub description: Option<String>,
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
    /// Displayed across the whole day regardless of times.
    pub full_day: bool,
    /// Approval state.
    pub status: RecordStatus,
    /// Kind of leave.
    pub category: RecordCategory,
}

impl NewRecord {
    /// Builds a pending record for `user` over `range`.
    #[must_use]
    pub fn for_user(user: &User, range: TimeRange, category: RecordCategory) -> Self {
        Self {
            user_id: user.id,
            user_name: user.name.clone(),
            title: None,
            description: None,
            start: range.start(),
            end: range.end(),
            full_day: false,
            status: RecordStatus::Pending,
            category,
        }
    }

    /// Sets the approval state.
    #[must_use]
    pub const fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = status;
        self
    }

    /// Marks the record as full-day.
    #[must_use]
    pub const fn full_day(mut self) -> Self {
        self.full_day = true;
        self
    }

    /// Attaches the record to the store under `id`.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> PtoRecord {
        PtoRecord {
            id,
            user_id: self.user_id,
            user_name: self.user_name,
            title: self.title,
            description: self.description,
            start: self.start,
            end: self.end,
            full_day: self.full_day,
            status: self.status,
            category: self.category,
        }
    }
}

/// A PTO or calendar record owned by [`super::EventStore`].
///
/// Invariant: `start <= end`. The store checks it on every write path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PtoRecord {
    /// Unique id (immutable after creation).
    pub id: RecordId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name of the owner.
    pub user_name: String,
    /// Optional short label shown on the grid.
    pub title: Option<String>,
    /// Optional free-text note.
    pub description: Option<String>,
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
    /// Displayed across the whole day regardless of times.
    pub full_day: bool,
    /// Approval state.
    pub status: RecordStatus,
    /// Kind of leave.
    pub category: RecordCategory,
}

impl PtoRecord {
    /// Returns the record's span as a [`TimeRange`].
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidRange`] if the fields were edited into
    /// an inverted range.
    pub fn range(&self) -> PlannerResult<TimeRange> {
        TimeRange::new(self.start, self.end)
    }

    /// Calendar days (UTC) touched by the record, in order.
    ///
    /// The end is exclusive, so a record ending exactly at midnight does not
    /// touch the following day. Zero-length records touch their start day.
    #[must_use]
    pub fn days(&self) -> Vec<NaiveDate> {
        let first = self.start.date_naive();
        let last = if self.end > self.start {
            (self.end - TimeDelta::nanoseconds(1)).date_naive()
        } else {
            first
        };
        first.iter_days().take_while(|d| *d <= last).collect()
    }

    /// Returns `true` if the record touches `date` (UTC).
    #[must_use]
    pub fn touches(&self, date: NaiveDate) -> bool {
        let first = self.start.date_naive();
        if self.end <= self.start {
            return first == date;
        }
        let last = (self.end - TimeDelta::nanoseconds(1)).date_naive();
        first <= date && date <= last
    }
}

/// A team member with a PTO allowance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Allotted PTO hours for the period.
    pub total_pto_hours: u32,
    /// Used PTO hours.
    ///
    /// Maintained separately from the record list, so it can drift from the
    /// hours actually booked.
    pub used_pto_hours: u32,
}

impl User {
    /// Creates a user with no hours used.
    #[must_use]
    pub fn new(name: impl Into<String>, total_pto_hours: u32) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            total_pto_hours,
            used_pto_hours: 0,
        }
    }

    /// Allowance left, never negative.
    #[must_use]
    pub const fn remaining_hours(&self) -> u32 {
        self.total_pto_hours.saturating_sub(self.used_pto_hours)
    }
}

/// A public holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holiday {
    /// Unique id.
    pub id: HolidayId,
    /// Display name.
    pub name: String,
    /// Date of the first (or only) occurrence.
    pub date: NaiveDate,
    /// Repeats on the same month and day every year.
    pub recurring: bool,
}

impl Holiday {
    /// Creates a holiday.
    #[must_use]
    pub fn new(name: impl Into<String>, date: NaiveDate, recurring: bool) -> Self {
        Self {
            id: HolidayId::new(),
            name: name.into(),
            date,
            recurring,
        }
    }

    /// Returns `true` if the holiday falls on `date`.
    #[must_use]
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        if self.recurring {
            self.date.month() == date.month() && self.date.day() == date.day()
        } else {
            self.date == date
        }
    }
}
