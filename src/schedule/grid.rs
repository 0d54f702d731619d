//! Pixel ↔ time-slot mapping for the week grid.
//!
//! The grid has seven day columns of `column_width` pixels and 24 hour rows
//! of `row_height` pixels. Vertical positions snap to `snap_minutes`,
//! horizontal positions to whole columns. Out-of-range positions are
//! clamped, never rejected.

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use serde::Serialize;

use super::week::{DAYS_PER_WEEK, WeekWindow};
use crate::domain::TimeRange;
use crate::error::{PlannerError, PlannerResult};

/// Minutes in a calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Physical dimensions and snapping rules of the week grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridGeometry {
    column_width: f64,
    row_height: f64,
    snap_minutes: u32,
    max_span_minutes: u32,
}

impl GridGeometry {
    /// Creates a geometry.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidConfig`] if a dimension is not a
    /// positive finite number, if `snap_minutes` is not between 1 and 60 and
    /// a divisor of 60, or if `max_span_minutes` is shorter than one snap
    /// unit or longer than a day.
    pub fn new(
        column_width: f64,
        row_height: f64,
        snap_minutes: u32,
        max_span_minutes: u32,
    ) -> PlannerResult<Self> {
        if !(column_width.is_finite() && column_width > 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "column width must be positive, got {column_width}"
            )));
        }
        if !(row_height.is_finite() && row_height > 0.0) {
            return Err(PlannerError::InvalidConfig(format!(
                "row height must be positive, got {row_height}"
            )));
        }
        if snap_minutes == 0 || snap_minutes > 60 || 60 % snap_minutes != 0 {
            return Err(PlannerError::InvalidConfig(format!(
                "snap minutes must divide 60, got {snap_minutes}"
            )));
        }
        if max_span_minutes < snap_minutes || max_span_minutes > MINUTES_PER_DAY {
            return Err(PlannerError::InvalidConfig(format!(
                "max span must lie between {snap_minutes} and {MINUTES_PER_DAY} minutes, got {max_span_minutes}"
            )));
        }
        Ok(Self {
            column_width,
            row_height,
            snap_minutes,
            max_span_minutes,
        })
    }

    /// Width of one day column in pixels.
    #[must_use]
    pub const fn column_width(&self) -> f64 {
        self.column_width
    }

    /// Height of one hour row in pixels.
    #[must_use]
    pub const fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Grid unit in minutes.
    #[must_use]
    pub const fn snap_minutes(&self) -> u32 {
        self.snap_minutes
    }

    /// Longest duration a resize may produce, in minutes.
    #[must_use]
    pub const fn max_span_minutes(&self) -> u32 {
        self.max_span_minutes
    }

    /// Total height of a day column in pixels.
    #[must_use]
    pub fn day_height(&self) -> f64 {
        self.row_height * 24.0
    }

    /// Converts a vertical pixel distance to minutes (unsnapped).
    #[must_use]
    pub fn pixels_to_minutes(&self, pixels: f64) -> f64 {
        pixels / self.row_height * 60.0
    }

    /// Converts minutes to a vertical pixel distance.
    #[must_use]
    pub fn minutes_to_pixels(&self, minutes: f64) -> f64 {
        minutes / 60.0 * self.row_height
    }

    /// Vertical offset of a timestamp inside its day column.
    #[must_use]
    pub fn top_of(&self, at: DateTime<Utc>) -> f64 {
        let minutes = at.hour() * 60 + at.minute();
        self.minutes_to_pixels(f64::from(minutes))
    }

    /// Maps a pointer position to the nearest slot.
    ///
    /// Minutes snap to the nearest grid unit and are clamped so the slot
    /// starts no later than one unit before midnight; columns snap down to
    /// the column under the pointer and are clamped to the visible week.
    /// NaN coordinates map to the first row or column.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_to_slot(&self, pixel_y: f64, pixel_x: f64) -> Slot {
        let snap = f64::from(self.snap_minutes);
        let latest = f64::from(MINUTES_PER_DAY - self.snap_minutes);
        let snapped = (self.pixels_to_minutes(pixel_y) / snap).round() * snap;
        // `as` saturates and maps NaN to zero.
        let minute_of_day = snapped.clamp(0.0, latest) as u32;

        let last_column = (DAYS_PER_WEEK - 1) as f64;
        let day_index = (pixel_x / self.column_width).floor().clamp(0.0, last_column) as u8;

        Slot::from_minute_of_day(day_index, minute_of_day)
    }

    /// Top-left pixel of a slot. Inverse of [`Self::pixel_to_slot`] for
    /// on-grid positions.
    #[must_use]
    pub fn slot_to_pixel(&self, slot: Slot) -> PixelPoint {
        PixelPoint {
            x: f64::from(slot.day_index) * self.column_width,
            y: self.minutes_to_pixels(f64::from(slot.minute_of_day())),
        }
    }

    /// Snaps a requested duration to the grid, bounded by one grid unit and
    /// [`Self::max_span_minutes`].
    #[must_use]
    pub fn snap_duration(&self, requested_minutes: i64) -> i64 {
        let snap = i64::from(self.snap_minutes);
        let max_span = i64::from(self.max_span_minutes);
        let bounded = requested_minutes.clamp(0, max_span);
        let snapped = (bounded + snap / 2).div_euclid(snap) * snap;
        snapped.clamp(snap, max_span)
    }

    /// Resizes `range` to the snapped form of `requested_minutes`, keeping
    /// its start.
    ///
    /// The result is never shorter than one grid unit, so the end always
    /// follows the start.
    #[must_use]
    pub fn resize_to_minutes(&self, range: TimeRange, requested_minutes: i64) -> TimeRange {
        range.with_duration(TimeDelta::minutes(self.snap_duration(requested_minutes)))
    }

    /// Resizes `range` to the duration shown by a block `height_px` tall.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn resize_by_pixels(&self, range: TimeRange, height_px: f64) -> TimeRange {
        let minutes = self.pixels_to_minutes(height_px).round();
        self.resize_to_minutes(range, minutes as i64)
    }

    /// Moves `range` so it starts at `slot`, keeping its duration.
    ///
    /// Returns `None` if the slot cannot be placed in `week`.
    #[must_use]
    pub fn move_range(&self, range: TimeRange, slot: Slot, week: &WeekWindow) -> Option<TimeRange> {
        slot.to_datetime(week).map(|start| range.with_start(start))
    }
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            column_width: 150.0,
            row_height: 60.0,
            snap_minutes: 60,
            max_span_minutes: 720,
        }
    }
}

/// A snapped grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Slot {
    /// Day column, 0..=6.
    pub day_index: u8,
    /// Hour, 0..=23.
    pub hour: u8,
    /// Minute within the hour, a multiple of the grid unit.
    pub minute: u8,
}

impl Slot {
    #[allow(clippy::cast_possible_truncation)]
    fn from_minute_of_day(day_index: u8, minute_of_day: u32) -> Self {
        let minute_of_day = minute_of_day.min(MINUTES_PER_DAY - 1);
        Self {
            day_index,
            hour: (minute_of_day / 60) as u8,
            minute: (minute_of_day % 60) as u8,
        }
    }

    /// Minutes since midnight.
    #[must_use]
    pub fn minute_of_day(&self) -> u32 {
        u32::from(self.hour) * 60 + u32::from(self.minute)
    }

    /// The timestamp this slot denotes inside `week`.
    #[must_use]
    pub fn to_datetime(&self, week: &WeekWindow) -> Option<DateTime<Utc>> {
        week.day(usize::from(self.day_index))?
            .and_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
            .map(|dt| dt.and_utc())
    }
}

/// A pixel coordinate relative to the top-left of the day columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PixelPoint {
    /// Horizontal offset.
    pub x: f64,
    /// Vertical offset.
    pub y: f64,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::schedule::week::{WeekStart, compute_week};
    use chrono::{NaiveDate, TimeZone};

    fn quarter_hour_grid() -> GridGeometry {
        let Ok(geometry) = GridGeometry::new(100.0, 60.0, 15, 720) else {
            panic!("valid geometry");
        };
        geometry
    }

    fn range(h1: u32, h2: u32) -> TimeRange {
        let (Some(start), Some(end)) = (
            Utc.with_ymd_and_hms(2025, 4, 21, h1, 0, 0).single(),
            Utc.with_ymd_and_hms(2025, 4, 21, h2, 0, 0).single(),
        ) else {
            panic!("valid timestamps");
        };
        let Ok(r) = TimeRange::new(start, end) else {
            panic!("valid range");
        };
        r
    }

    #[test]
    fn rejects_bad_geometry() {
        assert!(GridGeometry::new(0.0, 60.0, 60, 720).is_err());
        assert!(GridGeometry::new(100.0, f64::NAN, 60, 720).is_err());
        assert!(GridGeometry::new(100.0, 60.0, 7, 720).is_err());
        assert!(GridGeometry::new(100.0, 60.0, 30, 15).is_err());
        assert!(GridGeometry::new(100.0, 60.0, 30, 2000).is_err());
    }

    #[test]
    fn snaps_to_nearest_hour() {
        let grid = GridGeometry::default();
        let slot = grid.pixel_to_slot(149.0, 320.0);
        assert_eq!(slot, Slot { day_index: 2, hour: 2, minute: 0 });
        let slot = grid.pixel_to_slot(151.0, 0.0);
        assert_eq!(slot.hour, 3);
    }

    #[test]
    fn snaps_to_quarter_hours() {
        let grid = quarter_hour_grid();
        let slot = grid.pixel_to_slot(548.0, 99.9);
        assert_eq!(slot, Slot { day_index: 0, hour: 9, minute: 15 });
    }

    #[test]
    fn out_of_bounds_pixels_are_clamped() {
        let grid = GridGeometry::default();
        let below = grid.pixel_to_slot(5_000.0, 5_000.0);
        assert_eq!(below, Slot { day_index: 6, hour: 23, minute: 0 });
        let above = grid.pixel_to_slot(-300.0, -20.0);
        assert_eq!(above, Slot { day_index: 0, hour: 0, minute: 0 });
        let nan = grid.pixel_to_slot(f64::NAN, f64::INFINITY);
        assert_eq!(nan, Slot { day_index: 6, hour: 0, minute: 0 });

        for y in [-1e9, -1.0, 0.0, 719.0, 1439.0, 1440.0, 1e12] {
            for x in [-1e9, 0.0, 449.0, 1049.0, 1e12] {
                let slot = grid.pixel_to_slot(y, x);
                assert!(slot.hour <= 23);
                assert!(slot.day_index <= 6);
            }
        }
    }

    #[test]
    fn quarter_grid_pins_to_last_quarter() {
        let grid = quarter_hour_grid();
        let slot = grid.pixel_to_slot(1_439.0, 0.0);
        assert_eq!((slot.hour, slot.minute), (23, 45));
    }

    #[test]
    fn slot_to_pixel_inverts_pixel_to_slot() {
        let grid = quarter_hour_grid();
        let slot = Slot { day_index: 4, hour: 13, minute: 30 };
        let point = grid.slot_to_pixel(slot);
        assert!((point.x - 400.0).abs() < f64::EPSILON);
        assert!((point.y - 810.0).abs() < f64::EPSILON);
        assert_eq!(grid.pixel_to_slot(point.y, point.x), slot);
    }

    #[test]
    fn resize_enforces_minimum_grid_unit() {
        let grid = GridGeometry::default();
        let resized = grid.resize_to_minutes(range(9, 17), 10);
        assert_eq!(resized.duration().num_minutes(), 60);
        let resized = grid.resize_to_minutes(range(9, 17), -240);
        assert!(resized.end() > resized.start());
    }

    #[test]
    fn resize_snaps_and_caps() {
        let grid = quarter_hour_grid();
        assert_eq!(grid.snap_duration(100), 105);
        assert_eq!(grid.snap_duration(97), 90);
        assert_eq!(grid.snap_duration(2_000), 720);
    }

    #[test]
    fn extreme_requests_clamp_without_overflow() {
        let grid = quarter_hour_grid();
        assert_eq!(grid.snap_duration(i64::MIN), 15);
        assert_eq!(grid.snap_duration(i64::MAX), 720);
        let shrunk = grid.resize_to_minutes(range(9, 17), i64::MIN);
        assert_eq!(shrunk.duration().num_minutes(), 15);
        let shrunk = grid.resize_by_pixels(range(9, 17), -1e300);
        assert_eq!(shrunk.duration().num_minutes(), 15);
        let grown = grid.resize_by_pixels(range(9, 10), f64::INFINITY);
        assert_eq!(grown.duration().num_minutes(), 720);
        let nan = grid.resize_by_pixels(range(9, 10), f64::NAN);
        assert_eq!(nan.duration().num_minutes(), 15);
    }

    #[test]
    fn resize_by_pixels_uses_row_height() {
        let grid = GridGeometry::default();
        let resized = grid.resize_by_pixels(range(9, 10), 185.0);
        assert_eq!(resized.start(), range(9, 10).start());
        assert_eq!(resized.duration().num_hours(), 3);
    }

    #[test]
    fn move_range_keeps_duration() {
        let grid = GridGeometry::default();
        let Some(reference) = NaiveDate::from_ymd_opt(2025, 4, 23) else {
            panic!("valid date");
        };
        let week = compute_week(reference, WeekStart::Monday);
        let slot = grid.pixel_to_slot(840.0, 460.0);
        let Some(moved) = grid.move_range(range(9, 11), slot, &week) else {
            panic!("slot should map into the week");
        };
        assert_eq!(Some(moved.start()), Utc.with_ymd_and_hms(2025, 4, 24, 14, 0, 0).single());
        assert_eq!(moved.duration().num_hours(), 2);
    }

    #[test]
    fn top_of_uses_time_of_day() {
        let grid = GridGeometry::default();
        let Some(at) = Utc.with_ymd_and_hms(2025, 4, 21, 9, 30, 0).single() else {
            panic!("valid timestamp");
        };
        assert!((grid.top_of(at) - 570.0).abs() < f64::EPSILON);
        assert!((grid.day_height() - 1440.0).abs() < f64::EPSILON);
    }
}
