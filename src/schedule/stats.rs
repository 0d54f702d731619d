//! PTO hour statistics and the team summary.
//!
//! Hours are whole hours of `end - start`, truncated: a 90 minute record
//! counts as one hour.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{PtoRecord, RecordCategory, RecordStatus, User, UserId};

/// Whole hours covered by a record.
#[must_use]
pub fn record_hours(record: &PtoRecord) -> i64 {
    (record.end - record.start).num_hours()
}

/// Hours per record category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryHours {
    /// Vacation hours.
    pub vacation: i64,
    /// Personal-day hours.
    pub personal: i64,
    /// Hours from accepted suggestions.
    pub auto: i64,
    /// Hours placed manually.
    pub manual: i64,
}

impl CategoryHours {
    fn add(&mut self, category: RecordCategory, hours: i64) {
        let slot = match category {
            RecordCategory::Vacation => &mut self.vacation,
            RecordCategory::Personal => &mut self.personal,
            RecordCategory::Auto => &mut self.auto,
            RecordCategory::Manual => &mut self.manual,
        };
        *slot += hours;
    }

    /// Hours for one category.
    #[must_use]
    pub const fn get(&self, category: RecordCategory) -> i64 {
        match category {
            RecordCategory::Vacation => self.vacation,
            RecordCategory::Personal => self.personal,
            RecordCategory::Auto => self.auto,
            RecordCategory::Manual => self.manual,
        }
    }
}

/// Hours per approval state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusHours {
    /// Pending hours.
    pub pending: i64,
    /// Approved hours.
    pub approved: i64,
    /// Rejected hours.
    pub rejected: i64,
}

impl StatusHours {
    fn add(&mut self, status: RecordStatus, hours: i64) {
        let slot = match status {
            RecordStatus::Pending => &mut self.pending,
            RecordStatus::Approved => &mut self.approved,
            RecordStatus::Rejected => &mut self.rejected,
        };
        *slot += hours;
    }

    /// Hours for one status.
    #[must_use]
    pub const fn get(&self, status: RecordStatus) -> i64 {
        match status {
            RecordStatus::Pending => self.pending,
            RecordStatus::Approved => self.approved,
            RecordStatus::Rejected => self.rejected,
        }
    }
}

/// Aggregate hour statistics over a set of records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PtoStatistics {
    /// Sum over all records.
    pub total_hours: i64,
    /// Breakdown by category.
    pub by_category: CategoryHours,
    /// Breakdown by approval state.
    pub by_status: StatusHours,
    /// Breakdown by owner. Users without records are absent.
    pub by_user: BTreeMap<UserId, i64>,
}

impl PtoStatistics {
    /// Hours booked by `user_id`, zero when absent.
    #[must_use]
    pub fn hours_for(&self, user_id: UserId) -> i64 {
        self.by_user.get(&user_id).copied().unwrap_or(0)
    }
}

/// Sums record hours by category, status and user.
///
/// The result does not depend on input order.
pub fn aggregate<'a, I>(records: I) -> PtoStatistics
where
    I: IntoIterator<Item = &'a PtoRecord>,
{
    records
        .into_iter()
        .fold(PtoStatistics::default(), |mut stats, record| {
            let hours = record_hours(record);
            stats.total_hours += hours;
            stats.by_category.add(record.category, hours);
            stats.by_status.add(record.status, hours);
            *stats.by_user.entry(record.user_id).or_insert(0) += hours;
            stats
        })
}

/// One row of the team PTO summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMemberSummary {
    /// User id.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Used hours as recorded on the user.
    pub hours_used: u32,
    /// Allowance minus used hours.
    pub remaining_hours: u32,
    /// Hours derived from the user's records.
    pub booked_hours: i64,
    /// Days off, e.g. `"Apr 21 - Apr 22, Apr 29"`.
    pub date_ranges: String,
}

/// Builds the team summary, one row per user in input order.
#[must_use]
pub fn team_summary(users: &[User], records: &[PtoRecord]) -> Vec<TeamMemberSummary> {
    let stats = aggregate(records);
    users
        .iter()
        .map(|user| {
            let days: BTreeSet<NaiveDate> = records
                .iter()
                .filter(|r| r.user_id == user.id)
                .flat_map(PtoRecord::days)
                .collect();
            TeamMemberSummary {
                user_id: user.id,
                name: user.name.clone(),
                hours_used: user.used_pto_hours,
                remaining_hours: user.remaining_hours(),
                booked_hours: stats.hours_for(user.id),
                date_ranges: format_date_ranges(&days),
            }
        })
        .collect()
}

/// Formats sorted days as comma-separated runs of consecutive days.
#[must_use]
pub fn format_date_ranges(days: &BTreeSet<NaiveDate>) -> String {
    let mut runs: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    for day in days {
        match runs.last_mut() {
            Some((_, last)) if last.succ_opt() == Some(*day) => *last = *day,
            _ => runs.push((*day, *day)),
        }
    }
    runs.iter()
        .map(|(first, last)| {
            if first == last {
                first.format("%b %-d").to_string()
            } else {
                format!("{} - {}", first.format("%b %-d"), last.format("%b %-d"))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
