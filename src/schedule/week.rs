//! Week windowing: the visible 7-day span and navigation between weeks.

use std::fmt;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::PtoRecord;
use crate::error::PlannerError;

/// Number of day columns in the week grid.
pub const DAYS_PER_WEEK: usize = 7;

/// First day of the displayed week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeekStart {
    /// Weeks run Sunday to Saturday (index 0).
    Sunday,
    /// Weeks run Monday to Sunday (index 1).
    #[default]
    Monday,
}

impl WeekStart {
    /// Day index counted from Sunday (0 = Sunday, 1 = Monday).
    #[must_use]
    pub const fn index(self) -> u32 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
        }
    }
}

impl TryFrom<u8> for WeekStart {
    type Error = PlannerError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Sunday),
            1 => Ok(Self::Monday),
            other => Err(PlannerError::InvalidWeekStart(other)),
        }
    }
}

/// Navigation command from the week header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Navigation {
    /// One week back.
    Prev,
    /// One week forward.
    Next,
    /// Jump to the week containing today.
    Today,
}

/// Applies a navigation command to the current reference date.
#[must_use]
pub fn navigate(reference: NaiveDate, nav: Navigation, today: NaiveDate) -> NaiveDate {
    match nav {
        Navigation::Prev => reference
            .checked_sub_days(Days::new(7))
            .unwrap_or(reference),
        Navigation::Next => reference
            .checked_add_days(Days::new(7))
            .unwrap_or(reference),
        Navigation::Today => today,
    }
}

/// The seven calendar days currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    /// First day of the week.
    pub start: NaiveDate,
    /// Last day of the week (six days after `start`).
    pub end: NaiveDate,
    /// The seven days from `start` to `end`, in order.
    pub days: [NaiveDate; DAYS_PER_WEEK],
}

/// Computes the week containing `reference`.
///
/// The week starts on the most recent `week_starts_on` day at or before the
/// reference date. At the ends of the representable date range the window
/// is pinned to the first or last seven representable days.
#[must_use]
pub fn compute_week(reference: NaiveDate, week_starts_on: WeekStart) -> WeekWindow {
    let offset = (reference.weekday().num_days_from_sunday() + 7 - week_starts_on.index()) % 7;
    let latest_start = NaiveDate::MAX
        .checked_sub_days(Days::new(6))
        .unwrap_or(NaiveDate::MAX);
    let start = reference
        .checked_sub_days(Days::new(u64::from(offset)))
        .unwrap_or(NaiveDate::MIN)
        .min(latest_start);
    let days: [NaiveDate; DAYS_PER_WEEK] = std::array::from_fn(|i| {
        start
            .checked_add_days(Days::new(i as u64))
            .unwrap_or(NaiveDate::MAX)
    });
    WeekWindow {
        start,
        end: start.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX),
        days,
    }
}

impl WeekWindow {
    /// Returns the date of day column `day_index`, if in range.
    #[must_use]
    pub fn day(&self, day_index: usize) -> Option<NaiveDate> {
        self.days.get(day_index).copied()
    }

    /// Returns the column index of `date`, if it lies in this week.
    #[must_use]
    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        self.days.iter().position(|d| *d == date)
    }

    /// Returns `true` if `date` lies in this week.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns `true` if the record touches any day of the week.
    #[must_use]
    pub fn overlaps(&self, record: &PtoRecord) -> bool {
        self.days.iter().any(|d| record.touches(*d))
    }

    /// Records touching this week, in input order.
    pub fn filter<'a, I>(&self, records: I) -> Vec<&'a PtoRecord>
    where
        I: IntoIterator<Item = &'a PtoRecord>,
    {
        records.into_iter().filter(|r| self.overlaps(r)).collect()
    }

    /// Distributes records over the day columns.
    ///
    /// A record spanning several days appears in each column it touches.
    pub fn bucket<'a, I>(&self, records: I) -> [Vec<&'a PtoRecord>; DAYS_PER_WEEK]
    where
        I: IntoIterator<Item = &'a PtoRecord>,
    {
        let mut buckets: [Vec<&'a PtoRecord>; DAYS_PER_WEEK] = Default::default();
        for record in records {
            for (day, bucket) in self.days.iter().zip(buckets.iter_mut()) {
                if record.touches(*day) {
                    bucket.push(record);
                }
            }
        }
        buckets
    }

    /// Header title: `"April 21"`, or `"April 28 - May 4"` when the week
    /// crosses into another month.
    #[must_use]
    pub fn title(&self) -> String {
        if self.start.month() == self.end.month() {
            self.start.format("%B %-d").to_string()
        } else {
            format!(
                "{} - {}",
                self.start.format("%B %-d"),
                self.end.format("%B %-d")
            )
        }
    }
}

impl fmt::Display for WeekWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} .. {}", self.start, self.end)
    }
}

/// Days shown by a month mini-calendar: whole weeks covering the month of
/// `reference`.
#[must_use]
pub fn month_grid(reference: NaiveDate, week_starts_on: WeekStart) -> Vec<NaiveDate> {
    let first = reference.with_day(1).unwrap_or(reference);
    let last = first
        .checked_add_months(chrono::Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(first);
    let grid_start = compute_week(first, week_starts_on).start;
    let grid_end = compute_week(last, week_starts_on).end;
    grid_start
        .iter_days()
        .take_while(|d| *d <= grid_end)
        .collect()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{NewRecord, RecordCategory, RecordId, TimeRange, User};
    use chrono::{TimeZone, Utc, Weekday};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        let Some(d) = NaiveDate::from_ymd_opt(y, m, d) else {
            panic!("valid date");
        };
        d
    }

    fn record(d1: u32, h1: u32, d2: u32, h2: u32) -> PtoRecord {
        let (Some(start), Some(end)) = (
            Utc.with_ymd_and_hms(2025, 4, d1, h1, 0, 0).single(),
            Utc.with_ymd_and_hms(2025, 4, d2, h2, 0, 0).single(),
        ) else {
            panic!("valid timestamps");
        };
        let Ok(range) = TimeRange::new(start, end) else {
            panic!("valid range");
        };
        let user = User::new("Alice Moreau", 150);
        NewRecord::for_user(&user, range, RecordCategory::Vacation).into_record(RecordId::new())
    }

    #[test]
    fn monday_start_from_wednesday() {
        let week = compute_week(date(2025, 4, 23), WeekStart::Monday);
        assert_eq!(week.start, date(2025, 4, 21));
        assert_eq!(week.end, date(2025, 4, 27));
        assert_eq!(week.days.len(), 7);
        assert!(week.days.windows(2).all(|w| matches!(w, [a, b] if a.succ_opt() == Some(*b))));
    }

    #[test]
    fn sunday_start_from_wednesday() {
        let week = compute_week(date(2025, 4, 23), WeekStart::Sunday);
        assert_eq!(week.start, date(2025, 4, 20));
        assert_eq!(week.start.weekday(), Weekday::Sun);
        assert_eq!(week.end, date(2025, 4, 26));
    }

    #[test]
    fn reference_on_boundary_starts_the_week() {
        let week = compute_week(date(2025, 4, 21), WeekStart::Monday);
        assert_eq!(week.start, date(2025, 4, 21));
        let week = compute_week(date(2025, 4, 27), WeekStart::Sunday);
        assert_eq!(week.start, date(2025, 4, 27));
    }

    #[test]
    fn edges_of_date_range_are_pinned() {
        let last = compute_week(NaiveDate::MAX, WeekStart::Monday);
        assert_eq!(last.end, NaiveDate::MAX);
        assert_eq!(last.day(6), Some(NaiveDate::MAX));
        assert!(last.days.windows(2).all(|w| matches!(w, [a, b] if a < b)));

        let first = compute_week(NaiveDate::MIN, WeekStart::Sunday);
        assert_eq!(first.start, NaiveDate::MIN);
        assert!(first.contains(NaiveDate::MIN));

        let stuck = navigate(NaiveDate::MAX, Navigation::Next, NaiveDate::MIN);
        assert_eq!(compute_week(stuck, WeekStart::Monday), last);
    }

    #[test]
    fn week_start_from_index() {
        assert_eq!(WeekStart::try_from(0), Ok(WeekStart::Sunday));
        assert_eq!(WeekStart::try_from(1), Ok(WeekStart::Monday));
        assert_eq!(WeekStart::try_from(3), Err(PlannerError::InvalidWeekStart(3)));
    }

    #[test]
    fn navigation_moves_by_weeks() {
        let today = date(2025, 6, 10);
        let reference = date(2025, 4, 23);
        assert_eq!(navigate(reference, Navigation::Prev, today), date(2025, 4, 16));
        assert_eq!(navigate(reference, Navigation::Next, today), date(2025, 4, 30));
        assert_eq!(navigate(reference, Navigation::Today, today), today);
    }

    #[test]
    fn bucket_spreads_multi_day_records() {
        let week = compute_week(date(2025, 4, 23), WeekStart::Monday);
        let records = vec![record(21, 9, 21, 17), record(22, 0, 24, 0), record(28, 9, 28, 10)];
        let buckets = week.bucket(&records);
        let counts: Vec<usize> = buckets.iter().map(Vec::len).collect();
        assert_eq!(counts, vec![1, 1, 1, 0, 0, 0, 0]);
        assert_eq!(week.filter(&records).len(), 2);
    }

    #[test]
    fn record_spanning_whole_week_overlaps() {
        let week = compute_week(date(2025, 4, 23), WeekStart::Monday);
        let long = record(19, 0, 29, 0);
        assert!(week.overlaps(&long));
        assert!(week.bucket([&long]).iter().all(|b| b.len() == 1));
    }

    #[test]
    fn day_lookup() {
        let week = compute_week(date(2025, 4, 23), WeekStart::Monday);
        assert_eq!(week.day(2), Some(date(2025, 4, 23)));
        assert_eq!(week.day(7), None);
        assert_eq!(week.day_index(date(2025, 4, 27)), Some(6));
        assert!(!week.contains(date(2025, 4, 28)));
    }

    #[test]
    fn title_mentions_second_month_only_when_crossing() {
        let week = compute_week(date(2025, 4, 23), WeekStart::Monday);
        assert_eq!(week.title(), "April 21");
        let week = compute_week(date(2025, 4, 30), WeekStart::Monday);
        assert_eq!(week.title(), "April 28 - May 4");
    }

    #[test]
    fn month_grid_covers_whole_weeks() {
        let grid = month_grid(date(2025, 4, 23), WeekStart::Sunday);
        assert_eq!(grid.len() % 7, 0);
        assert_eq!(grid.first().copied(), Some(date(2025, 3, 30)));
        assert_eq!(grid.last().copied(), Some(date(2025, 5, 3)));
    }
}
