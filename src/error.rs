//! Planner error types with numeric code mapping.
//!
//! [`PlannerError`] is the central error type for the crate. Record lookups
//! by id never produce an error: an unknown id is a silent no-op, reported
//! through `bool` / `Option` return values instead.

use chrono::{DateTime, Utc};

use crate::domain::UserId;

/// Crate-wide error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category      |
/// |-----------|---------------|
/// | 1000–1999 | Validation    |
/// | 2000–2999 | Lookup        |
/// | 3000–3999 | Configuration |
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlannerError {
    /// A range whose end lies before its start.
    #[error("invalid range: end {end} is before start {start}")]
    InvalidRange {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
    },

    /// A required form field was left empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A date string that is not `YYYY-MM-DD`.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A time string that is not `HH:MM`.
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// Unknown record category.
    #[error("invalid category: {0}")]
    InvalidCategory(String),

    /// Unknown record status.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// An identifier that is not a UUID.
    #[error("invalid id: {0}")]
    InvalidId(String),

    /// Week start index other than 0 (Sunday) or 1 (Monday).
    #[error("invalid week start: {0} (expected 0 or 1)")]
    InvalidWeekStart(u8),

    /// A submission referenced a user that is not in the store.
    #[error("unknown user: {0}")]
    UnknownUser(UserId),

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PlannerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRange { .. } => 1001,
            Self::MissingField(_) => 1002,
            Self::InvalidDate(_) => 1003,
            Self::InvalidTime(_) => 1004,
            Self::InvalidCategory(_) => 1005,
            Self::InvalidStatus(_) => 1006,
            Self::InvalidId(_) => 1007,
            Self::UnknownUser(_) => 2001,
            Self::InvalidWeekStart(_) => 3001,
            Self::InvalidConfig(_) => 3002,
        }
    }

    /// Returns `true` for errors caused by user-supplied input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        self.error_code() < 2000
    }
}

/// Convenience alias used throughout the crate.
pub type PlannerResult<T> = Result<T, PlannerError>;
