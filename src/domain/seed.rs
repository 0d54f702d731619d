//! Sample team data for demos and tests.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use super::{EventStore, Holiday, NewRecord, RecordCategory, RecordStatus, User};
use crate::error::{PlannerError, PlannerResult};

/// Reference date the sample data is arranged around (a Wednesday).
pub const SAMPLE_REFERENCE_DATE: (i32, u32, u32) = (2025, 4, 23);

/// Returns [`SAMPLE_REFERENCE_DATE`] as a [`NaiveDate`].
///
/// # Errors
///
/// Returns [`PlannerError::InvalidDate`] if the constant is not a valid date.
pub fn sample_reference_date() -> PlannerResult<NaiveDate> {
    let (y, m, d) = SAMPLE_REFERENCE_DATE;
    date(y, m, d)
}

/// Fills `store` with five users, a fortnight of PTO records and fixed-date
/// holidays.
///
/// # Errors
///
/// Returns a [`PlannerError`] if a hard-coded timestamp is invalid.
pub fn populate(store: &mut EventStore, allowance_hours: u32) -> PlannerResult<()> {
    let team = [
        ("Alice Moreau", 32),
        ("Bilal Khan", 24),
        ("Carmen Ortiz", 40),
        ("Dmitri Volkov", 16),
        ("Emeka Obi", 48),
    ];
    let mut users = Vec::with_capacity(team.len());
    for (name, used) in team {
        let mut user = User::new(name, allowance_hours);
        user.used_pto_hours = used;
        store.add_user(user.clone());
        users.push(user);
    }

    // (user index, start, end, full day, category, status)
    let bookings = [
        (0, at(2025, 4, 21, 9)?, at(2025, 4, 21, 17)?, false, RecordCategory::Vacation, RecordStatus::Approved),
        (4, at(2025, 4, 22, 9)?, at(2025, 4, 22, 17)?, false, RecordCategory::Auto, RecordStatus::Approved),
        (1, at(2025, 4, 25, 14)?, at(2025, 4, 25, 17)?, false, RecordCategory::Personal, RecordStatus::Approved),
        (
            0,
            at(2025, 4, 29, 0)?,
            at(2025, 4, 30, 0)? - TimeDelta::milliseconds(1),
            true,
            RecordCategory::Auto,
            RecordStatus::Approved,
        ),
        (1, at(2025, 4, 30, 15)?, at(2025, 4, 30, 18)?, false, RecordCategory::Auto, RecordStatus::Pending),
        (2, at(2025, 5, 2, 13)?, at(2025, 5, 2, 17)?, false, RecordCategory::Auto, RecordStatus::Pending),
        (3, at(2025, 5, 5, 14)?, at(2025, 5, 5, 16)?, false, RecordCategory::Manual, RecordStatus::Rejected),
    ];
    for (index, start, end, full_day, category, status) in bookings {
        let Some(user) = users.get(index) else {
            continue;
        };
        store.add_record(NewRecord {
            user_id: user.id,
            user_name: user.name.clone(),
            title: None,
            description: None,
            start,
            end,
            full_day,
            status,
            category,
        })?;
    }

    for (name, m, d) in [
        ("New Year's Day", 1, 1),
        ("Juneteenth", 6, 19),
        ("Independence Day", 7, 4),
        ("Veterans Day", 11, 11),
        ("Christmas Day", 12, 25),
    ] {
        store.add_holiday(Holiday::new(name, date(2024, m, d)?, true));
    }

    tracing::info!(
        users = store.users().len(),
        records = store.len(),
        holidays = store.holidays().len(),
        "sample data loaded"
    );
    Ok(())
}

fn date(y: i32, m: u32, d: u32) -> PlannerResult<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| PlannerError::InvalidDate(format!("{y:04}-{m:02}-{d:02}")))
}

fn at(y: i32, m: u32, d: u32, hour: u32) -> PlannerResult<DateTime<Utc>> {
    date(y, m, d)?
        .and_hms_opt(hour, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| PlannerError::InvalidTime(format!("{hour:02}:00")))
}
