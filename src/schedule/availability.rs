//! Overlap detection and free-slot suggestions.
//!
//! Existing records occupy the half-open interval `[start, end)`: a
//! candidate that ends exactly when a record starts (or starts exactly when
//! it ends) is available.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc, Weekday};
use serde::Serialize;

use super::week::WeekWindow;
use crate::domain::{Holiday, PtoRecord, TimeRange};
use crate::error::{PlannerError, PlannerResult};

/// Returns `true` if the candidate overlaps the existing interval.
///
/// Callers must pass `candidate_start <= candidate_end`.
fn conflicts(
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
    existing_start: DateTime<Utc>,
    existing_end: DateTime<Utc>,
) -> bool {
    let start_inside = existing_start <= candidate_start && candidate_start < existing_end;
    let end_inside = candidate_start < candidate_end
        && existing_start < candidate_end
        && candidate_end <= existing_end;
    let contains = candidate_start < existing_start && existing_end < candidate_end;
    start_inside || end_inside || contains
}

/// Returns `true` if `[candidate_start, candidate_end)` is free of every
/// existing record.
///
/// `candidate_end < candidate_start` is a caller error; use
/// [`TimeRange::new`] to rule it out before calling.
pub fn is_range_available<'a, I>(
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
    existing: I,
) -> bool
where
    I: IntoIterator<Item = &'a PtoRecord>,
{
    !existing
        .into_iter()
        .any(|r| conflicts(candidate_start, candidate_end, r.start, r.end))
}

/// Records that make `candidate` unavailable, in input order.
pub fn find_conflicts<'a, I>(candidate: &TimeRange, existing: I) -> Vec<&'a PtoRecord>
where
    I: IntoIterator<Item = &'a PtoRecord>,
{
    existing
        .into_iter()
        .filter(|r| conflicts(candidate.start(), candidate.end(), r.start, r.end))
        .collect()
}

/// Working days and hours used when suggesting slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkingHours {
    start_hour: u32,
    end_hour: u32,
    days: Vec<Weekday>,
}

impl WorkingHours {
    /// Creates a working-hours window.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidConfig`] if `start_hour >= end_hour`
    /// or `end_hour > 24`.
    pub fn new(start_hour: u32, end_hour: u32, days: Vec<Weekday>) -> PlannerResult<Self> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(PlannerError::InvalidConfig(format!(
                "working hours {start_hour}..{end_hour} are not a valid window"
            )));
        }
        Ok(Self {
            start_hour,
            end_hour,
            days,
        })
    }

    /// First working hour.
    #[must_use]
    pub const fn start_hour(&self) -> u32 {
        self.start_hour
    }

    /// Hour at which work ends (exclusive).
    #[must_use]
    pub const fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// Working weekdays.
    #[must_use]
    pub fn days(&self) -> &[Weekday] {
        &self.days
    }

    /// Returns `true` if `date` is a working day and not a holiday.
    #[must_use]
    pub fn is_working_day(&self, date: NaiveDate, holidays: &[Holiday]) -> bool {
        self.days.contains(&date.weekday()) && !holidays.iter().any(|h| h.applies_on(date))
    }

    /// The working window of `date`, ignoring holidays.
    #[must_use]
    pub fn window(&self, date: NaiveDate) -> Option<TimeRange> {
        let start = date.and_hms_opt(self.start_hour, 0, 0)?.and_utc();
        let end = if self.end_hour == 24 {
            date.succ_opt()?.and_hms_opt(0, 0, 0)?.and_utc()
        } else {
            date.and_hms_opt(self.end_hour, 0, 0)?.and_utc()
        };
        TimeRange::new(start, end).ok()
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self {
            start_hour: 9,
            end_hour: 17,
            days: vec![
                Weekday::Mon,
                Weekday::Tue,
                Weekday::Wed,
                Weekday::Thu,
                Weekday::Fri,
            ],
        }
    }
}

/// Finds free slots inside working hours.
#[derive(Debug, Clone, Copy)]
pub struct SlotFinder<'a> {
    hours: &'a WorkingHours,
    holidays: &'a [Holiday],
    step_minutes: u32,
}

impl<'a> SlotFinder<'a> {
    /// Creates a finder trying start times every `step_minutes` (at least
    /// one minute).
    #[must_use]
    pub fn new(hours: &'a WorkingHours, holidays: &'a [Holiday], step_minutes: u32) -> Self {
        Self {
            hours,
            holidays,
            step_minutes: step_minutes.max(1),
        }
    }

    /// Returns the earliest available range of `duration_minutes` in `week`.
    ///
    /// Days are scanned in order, skipping non-working days and holidays;
    /// within a day, start times advance by the step from the start of
    /// working hours. A zero duration, or one longer than the working day,
    /// yields `None`.
    #[must_use]
    pub fn suggest(
        &self,
        week: &WeekWindow,
        duration_minutes: u32,
        existing: &[PtoRecord],
    ) -> Option<TimeRange> {
        if duration_minutes == 0 {
            return None;
        }
        let duration = TimeDelta::minutes(i64::from(duration_minutes));
        let step = TimeDelta::minutes(i64::from(self.step_minutes));

        week.days
            .iter()
            .filter(|d| self.hours.is_working_day(**d, self.holidays))
            .filter_map(|d| self.hours.window(*d))
            .find_map(|window| {
                let mut start = window.start();
                while start + duration <= window.end() {
                    if is_range_available(start, start + duration, existing) {
                        return TimeRange::starting_at(start, duration).ok();
                    }
                    start += step;
                }
                None
            })
    }
}
