//! Parsing of the custom-break submission form.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{NewRecord, RecordCategory, TimeRange, User, UserId};
use crate::error::{PlannerError, PlannerResult};

/// Raw field values from the submission form.
///
/// Dates are `YYYY-MM-DD`, times `HH:MM`. An empty `end_date` means the
/// record ends on `start_date`; times are ignored for full-day records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordForm {
    /// Owner id as a UUID string.
    pub user_id: String,
    /// First day.
    pub start_date: String,
    /// Last day, optional.
    pub end_date: String,
    /// Start time, required unless `full_day`.
    pub start_time: String,
    /// End time, required unless `full_day`.
    pub end_time: String,
    /// Covers whole days.
    pub full_day: bool,
    /// One of `vacation`, `personal`, `auto`, `manual`.
    pub category: String,
    /// Optional label.
    pub title: String,
    /// Optional free-text note.
    pub description: String,
}

impl RecordForm {
    /// Parses the owner id.
    ///
    /// # Errors
    ///
    /// [`PlannerError::MissingField`] when empty, [`PlannerError::InvalidId`]
    /// when not a UUID.
    pub fn user_id(&self) -> PlannerResult<UserId> {
        let raw = required("user_id", &self.user_id)?;
        raw.parse()
            .map_err(|_| PlannerError::InvalidId(raw.to_string()))
    }

    /// Builds a pending record for `user` from the form fields.
    ///
    /// Full-day records run from `00:00:00.000` on the start date to
    /// `23:59:59.999` on the end date.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::MissingField`] for empty required fields,
    /// [`PlannerError::InvalidDate`], [`PlannerError::InvalidTime`] or
    /// [`PlannerError::InvalidCategory`] for malformed values, and
    /// [`PlannerError::InvalidRange`] if the end precedes the start.
    pub fn to_new_record(&self, user: &User) -> PlannerResult<NewRecord> {
        let start_date = parse_date(required("start_date", &self.start_date)?)?;
        let end_date = match self.end_date.trim() {
            "" => start_date,
            raw => parse_date(raw)?,
        };
        let category: RecordCategory = required("category", &self.category)?.parse()?;

        let range = if self.full_day {
            TimeRange::new(
                at(start_date, NaiveTime::MIN),
                at(end_date, last_instant_of_day()),
            )?
        } else {
            let start_time = parse_time(required("start_time", &self.start_time)?)?;
            let end_time = parse_time(required("end_time", &self.end_time)?)?;
            TimeRange::new(at(start_date, start_time), at(end_date, end_time))?
        };

        let mut record = NewRecord::for_user(user, range, category);
        if self.full_day {
            record = record.full_day();
        }
        record.title = optional(&self.title);
        record.description = optional(&self.description);
        Ok(record)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> PlannerResult<&'a str> {
    match value.trim() {
        "" => Err(PlannerError::MissingField(field)),
        trimmed => Ok(trimmed),
    }
}

fn optional(value: &str) -> Option<String> {
    Some(value.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_date(raw: &str) -> PlannerResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| PlannerError::InvalidDate(raw.to_string()))
}

fn parse_time(raw: &str) -> PlannerResult<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M").map_err(|_| PlannerError::InvalidTime(raw.to_string()))
}

fn last_instant_of_day() -> NaiveTime {
    NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN)
}

fn at(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    date.and_time(time).and_utc()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::RecordStatus;
    use chrono::Timelike;

    fn form() -> (User, RecordForm) {
        let user = User::new("Carmen Ortiz", 150);
        let form = RecordForm {
            user_id: user.id.to_string(),
            start_date: "2025-04-24".to_string(),
            start_time: "10:00".to_string(),
            end_time: "12:30".to_string(),
            category: "personal".to_string(),
            ..RecordForm::default()
        };
        (user, form)
    }

    #[test]
    fn timed_record_is_pending() {
        let (user, form) = form();
        let Ok(record) = form.to_new_record(&user) else {
            panic!("form should parse");
        };
        assert_eq!(record.user_id, user.id);
        assert_eq!(record.status, RecordStatus::Pending);
        assert_eq!(record.category, RecordCategory::Personal);
        assert!(!record.full_day);
        assert_eq!((record.start.hour(), record.end.hour(), record.end.minute()), (10, 12, 30));
        assert_eq!(record.title, None);
        assert_eq!(record.description, None);
        assert_eq!(form.user_id(), Ok(user.id));
    }

    #[test]
    fn full_day_spans_to_last_millisecond() {
        let (user, mut form) = form();
        form.full_day = true;
        form.end_date = "2025-04-25".to_string();
        form.start_time.clear();
        form.title = "  Long weekend ".to_string();
        form.description = "Visiting family in Porto".to_string();
        let Ok(record) = form.to_new_record(&user) else {
            panic!("form should parse");
        };
        assert!(record.full_day);
        assert_eq!(record.start.time(), NaiveTime::MIN);
        assert_eq!(record.end.date_naive(), NaiveDate::from_ymd_opt(2025, 4, 25).unwrap_or_default());
        assert_eq!(record.end.timestamp_subsec_millis(), 999);
        assert_eq!(record.title.as_deref(), Some("Long weekend"));
        assert_eq!(record.description.as_deref(), Some("Visiting family in Porto"));
    }

    #[test]
    fn missing_fields_are_named() {
        let (user, mut form) = form();
        form.start_time = "  ".to_string();
        assert_eq!(form.to_new_record(&user), Err(PlannerError::MissingField("start_time")));
        form.category.clear();
        assert_eq!(form.to_new_record(&user), Err(PlannerError::MissingField("category")));
        form.user_id.clear();
        assert_eq!(form.user_id(), Err(PlannerError::MissingField("user_id")));
    }

    #[test]
    fn malformed_values_are_rejected() {
        let (user, mut form) = form();
        form.end_time = "25:00".to_string();
        assert_eq!(form.to_new_record(&user), Err(PlannerError::InvalidTime("25:00".to_string())));

        let (user, mut form) = self::form();
        form.start_date = "24/04/2025".to_string();
        assert_eq!(form.to_new_record(&user), Err(PlannerError::InvalidDate("24/04/2025".to_string())));

        let (user, mut form) = self::form();
        form.category = "sabbatical".to_string();
        assert_eq!(
            form.to_new_record(&user),
            Err(PlannerError::InvalidCategory("sabbatical".to_string()))
        );

        form.user_id = "not-a-uuid".to_string();
        assert_eq!(form.user_id(), Err(PlannerError::InvalidId("not-a-uuid".to_string())));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let (user, mut form) = form();
        form.start_time = "15:00".to_string();
        assert!(matches!(form.to_new_record(&user), Err(PlannerError::InvalidRange { .. })));
    }
}
