//! Planner configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Every key has a default; keys that
//! feed validated types (week start, grid, working hours) reject
//! unparsable or out-of-range values, the rest fall back to their default
//! when unparsable.

use chrono::Weekday;

use crate::error::{PlannerError, PlannerResult};
use crate::schedule::{GridGeometry, WeekStart, WorkingHours};

/// Top-level planner configuration.
///
/// Loaded once at startup via [`PlannerConfig::from_env`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// First day of the visible week.
    pub week_starts_on: WeekStart,

    /// Pixel geometry and snapping of the week grid.
    pub geometry: GridGeometry,

    /// Working days and hours used for slot suggestions.
    pub working_hours: WorkingHours,

    /// PTO allowance given to users created without an explicit one.
    pub default_allowance_hours: u32,

    /// Capacity of the EventBus broadcast channel.
    pub event_bus_capacity: usize,
}

impl PlannerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidWeekStart`] or
    /// [`PlannerError::InvalidConfig`] if a validated key is set to an
    /// unparsable or out-of-range value.
    pub fn from_env() -> PlannerResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup<F>(lookup: F) -> PlannerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let week_start_index: u8 = parse_validated(&lookup, "PLANNER_WEEK_STARTS_ON", 1)?;
        let week_starts_on = WeekStart::try_from(week_start_index)?;

        let geometry = GridGeometry::new(
            parse_validated(&lookup, "PLANNER_COLUMN_WIDTH_PX", 150.0)?,
            parse_validated(&lookup, "PLANNER_ROW_HEIGHT_PX", 60.0)?,
            parse_validated(&lookup, "PLANNER_SNAP_MINUTES", 60)?,
            parse_validated(&lookup, "PLANNER_MAX_SPAN_MINUTES", 720)?,
        )?;

        let working_days = match lookup("PLANNER_WORKING_DAYS") {
            Some(raw) => parse_weekdays(&raw)?,
            None => WorkingHours::default().days().to_vec(),
        };
        let working_hours = WorkingHours::new(
            parse_validated(&lookup, "PLANNER_WORKING_HOURS_START", 9)?,
            parse_validated(&lookup, "PLANNER_WORKING_HOURS_END", 17)?,
            working_days,
        )?;

        let default_allowance_hours = parse_env(&lookup, "PLANNER_DEFAULT_ALLOWANCE_HOURS", 150);
        let event_bus_capacity = parse_env(&lookup, "EVENT_BUS_CAPACITY", 1024);

        Ok(Self {
            week_starts_on,
            geometry,
            working_hours,
            default_allowance_hours,
            event_bus_capacity,
        })
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            week_starts_on: WeekStart::default(),
            geometry: GridGeometry::default(),
            working_hours: WorkingHours::default(),
            default_allowance_hours: 150,
            event_bus_capacity: 1024,
        }
    }
}

/// Parses a looked-up value as `T`, returning `default` on missing or
/// invalid values.
fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses a looked-up value as `T` for a key whose value is validated.
/// Missing keys yield `default`; present but unparsable values are errors.
fn parse_validated<F, T>(lookup: &F, key: &str, default: T) -> PlannerResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| PlannerError::InvalidConfig(format!("{key} has invalid value {raw:?}"))),
    }
}

/// Parses a comma-separated list of weekday indices, Sunday = 0.
fn parse_weekdays(raw: &str) -> PlannerResult<Vec<Weekday>> {
    let mut days = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let day = match part {
            "0" => Weekday::Sun,
            "1" => Weekday::Mon,
            "2" => Weekday::Tue,
            "3" => Weekday::Wed,
            "4" => Weekday::Thu,
            "5" => Weekday::Fri,
            "6" => Weekday::Sat,
            other => {
                return Err(PlannerError::InvalidConfig(format!(
                    "working day must be 0-6, got {other:?}"
                )));
            }
        };
        if !days.contains(&day) {
            days.push(day);
        }
    }
    if days.is_empty() {
        return Err(PlannerError::InvalidConfig(
            "at least one working day is required".to_string(),
        ));
    }
    Ok(days)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> PlannerResult<PlannerConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        PlannerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let Ok(config) = load(&[]) else {
            panic!("defaults must load");
        };
        assert_eq!(config, PlannerConfig::default());
        assert_eq!(config.week_starts_on, WeekStart::Monday);
        assert_eq!(config.geometry.snap_minutes(), 60);
        assert_eq!(config.event_bus_capacity, 1024);
    }

    #[test]
    fn overrides_are_applied() {
        let Ok(config) = load(&[
            ("PLANNER_WEEK_STARTS_ON", "0"),
            ("PLANNER_SNAP_MINUTES", "15"),
            ("PLANNER_ROW_HEIGHT_PX", "48"),
            ("PLANNER_WORKING_DAYS", "1, 3,5"),
            ("PLANNER_WORKING_HOURS_START", "8"),
            ("PLANNER_DEFAULT_ALLOWANCE_HOURS", "200"),
        ]) else {
            panic!("overrides must load");
        };
        assert_eq!(config.week_starts_on, WeekStart::Sunday);
        assert_eq!(config.geometry.snap_minutes(), 15);
        assert!((config.geometry.row_height() - 48.0).abs() < f64::EPSILON);
        assert_eq!(
            config.working_hours.days(),
            &[Weekday::Mon, Weekday::Wed, Weekday::Fri]
        );
        assert_eq!(config.working_hours.start_hour(), 8);
        assert_eq!(config.default_allowance_hours, 200);
    }

    #[test]
    fn unparsable_plain_values_fall_back() {
        let Ok(config) = load(&[("EVENT_BUS_CAPACITY", "lots")]) else {
            panic!("fallback expected");
        };
        assert_eq!(config.event_bus_capacity, 1024);
    }

    #[test]
    fn invalid_validated_values_are_errors() {
        assert_eq!(
            load(&[("PLANNER_WEEK_STARTS_ON", "3")]),
            Err(PlannerError::InvalidWeekStart(3))
        );
        for key in [
            "PLANNER_WEEK_STARTS_ON",
            "PLANNER_COLUMN_WIDTH_PX",
            "PLANNER_ROW_HEIGHT_PX",
            "PLANNER_SNAP_MINUTES",
            "PLANNER_MAX_SPAN_MINUTES",
            "PLANNER_WORKING_HOURS_START",
            "PLANNER_WORKING_HOURS_END",
        ] {
            assert!(
                matches!(load(&[(key, "sunday")]), Err(PlannerError::InvalidConfig(_))),
                "{key} should reject an unparsable value"
            );
        }
        assert!(matches!(
            load(&[("PLANNER_SNAP_MINUTES", "7")]),
            Err(PlannerError::InvalidConfig(_))
        ));
        assert!(matches!(
            load(&[("PLANNER_WORKING_DAYS", "1,9")]),
            Err(PlannerError::InvalidConfig(_))
        ));
        assert!(matches!(
            load(&[("PLANNER_WORKING_HOURS_START", "18")]),
            Err(PlannerError::InvalidConfig(_))
        ));
    }
}
