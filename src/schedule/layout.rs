//! Placement of records inside a single day column.
//!
//! Overlapping timed records are drawn side by side: each transitively
//! overlapping cluster is split into lanes and every record takes the first
//! lane that is free at its start time.

use chrono::{NaiveDate, TimeDelta};
use serde::Serialize;

use super::grid::GridGeometry;
use crate::domain::{PtoRecord, RecordId};

/// Where to draw one record in a day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPlacement {
    /// Record being placed.
    pub record_id: RecordId,
    /// Vertical offset from the top of the column, in pixels.
    pub top: f64,
    /// Block height in pixels.
    pub height: f64,
    /// Lane index inside the overlap cluster.
    pub lane: usize,
    /// Number of lanes in the cluster; the block is `1 / lanes` wide.
    pub lanes: usize,
    /// Whether the record is drawn across the whole day.
    pub full_day: bool,
}

impl EventPlacement {
    /// Left edge as a fraction of the column width.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn left_fraction(&self) -> f64 {
        self.lane as f64 / self.lanes.max(1) as f64
    }

    /// Width as a fraction of the column width.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn width_fraction(&self) -> f64 {
        1.0 / self.lanes.max(1) as f64
    }
}

struct Segment {
    record_id: RecordId,
    start_min: i64,
    end_min: i64,
}

/// Lays out the records touching `date`.
///
/// Full-day records come first and span the whole column. Timed records are
/// clipped to the day and returned in start order.
pub fn layout_day<'a, I>(date: NaiveDate, records: I, geometry: &GridGeometry) -> Vec<EventPlacement>
where
    I: IntoIterator<Item = &'a PtoRecord>,
{
    let Some(day_start) = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()) else {
        return Vec::new();
    };
    let day_end = day_start + TimeDelta::days(1);

    let mut placements = Vec::new();
    let mut segments = Vec::new();
    for record in records.into_iter().filter(|r| r.touches(date)) {
        if record.full_day {
            placements.push(EventPlacement {
                record_id: record.id,
                top: 0.0,
                height: geometry.day_height(),
                lane: 0,
                lanes: 1,
                full_day: true,
            });
            continue;
        }
        let start = record.start.max(day_start);
        let end = record.end.min(day_end).max(start);
        segments.push(Segment {
            record_id: record.id,
            start_min: (start - day_start).num_minutes(),
            end_min: (end - day_start).num_minutes(),
        });
    }
    segments.sort_by_key(|s| (s.start_min, std::cmp::Reverse(s.end_min)));

    let mut cluster: Vec<(Segment, usize)> = Vec::new();
    let mut lane_ends: Vec<i64> = Vec::new();
    let mut cluster_end = i64::MIN;
    for segment in segments {
        if !cluster.is_empty() && segment.start_min >= cluster_end {
            flush_cluster(&mut cluster, lane_ends.len(), geometry, &mut placements);
            lane_ends.clear();
        }
        let lane = match lane_ends.iter().position(|end| *end <= segment.start_min) {
            Some(free) => free,
            None => {
                lane_ends.push(segment.end_min);
                lane_ends.len() - 1
            }
        };
        if let Some(end) = lane_ends.get_mut(lane) {
            *end = segment.end_min;
        }
        cluster_end = if cluster.is_empty() {
            segment.end_min
        } else {
            cluster_end.max(segment.end_min)
        };
        cluster.push((segment, lane));
    }
    flush_cluster(&mut cluster, lane_ends.len(), geometry, &mut placements);
    placements
}

#[allow(clippy::cast_precision_loss)]
fn flush_cluster(
    cluster: &mut Vec<(Segment, usize)>,
    lanes: usize,
    geometry: &GridGeometry,
    placements: &mut Vec<EventPlacement>,
) {
    for (segment, lane) in cluster.drain(..) {
        placements.push(EventPlacement {
            record_id: segment.record_id,
            top: geometry.minutes_to_pixels(segment.start_min as f64),
            height: geometry.minutes_to_pixels((segment.end_min - segment.start_min) as f64),
            lane,
            lanes: lanes.max(1),
            full_day: false,
        });
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{NewRecord, RecordCategory, TimeRange, User};
    use chrono::{TimeZone, Utc};

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
        let user = User::new("Carmen Ortiz", 150);
        NewRecord::for_user(&user, range, RecordCategory::Auto).into_record(RecordId::new())
    }

    fn day() -> NaiveDate {
        let Some(d) = NaiveDate::from_ymd_opt(2025, 4, 21) else {
            panic!("valid date");
        };
        d
    }

    fn placement_of(placements: &[EventPlacement], id: RecordId) -> &EventPlacement {
        let Some(p) = placements.iter().find(|p| p.record_id == id) else {
            panic!("record not placed");
        };
        p
    }

    #[test]
    fn overlapping_records_share_lanes() {
        let a = record(21, 9, 21, 12);
        let b = record(21, 10, 21, 11);
        let c = record(21, 14, 21, 15);
        let records = vec![a.clone(), b.clone(), c.clone()];
        let placements = layout_day(day(), &records, &GridGeometry::default());

        assert_eq!(placements.len(), 3);
        let pa = placement_of(&placements, a.id);
        let pb = placement_of(&placements, b.id);
        let pc = placement_of(&placements, c.id);
        assert_eq!((pa.lane, pa.lanes), (0, 2));
        assert_eq!((pb.lane, pb.lanes), (1, 2));
        assert_eq!((pc.lane, pc.lanes), (0, 1));
        assert!((pb.left_fraction() - 0.5).abs() < f64::EPSILON);
        assert!((pa.top - 540.0).abs() < f64::EPSILON);
        assert!((pa.height - 180.0).abs() < f64::EPSILON);
    }

    #[test]
    fn freed_lane_is_reused_within_cluster() {
        let a = record(21, 9, 21, 13);
        let b = record(21, 9, 21, 10);
        let c = record(21, 11, 21, 12);
        let records = vec![a, b.clone(), c.clone()];
        let placements = layout_day(day(), &records, &GridGeometry::default());
        assert_eq!(placement_of(&placements, b.id).lane, 1);
        assert_eq!(placement_of(&placements, c.id).lane, 1);
        assert!(placements.iter().all(|p| p.lanes == 2));
    }

    #[test]
    fn touching_records_form_separate_clusters() {
        let a = record(21, 9, 21, 10);
        let b = record(21, 10, 21, 11);
        let records = vec![a, b];
        let placements = layout_day(day(), &records, &GridGeometry::default());
        assert!(placements.iter().all(|p| p.lane == 0 && p.lanes == 1));
    }

    #[test]
    fn full_day_and_multi_day_records() {
        let mut full = record(21, 0, 21, 23);
        full.full_day = true;
        let overnight = record(20, 22, 21, 2);
        let records = vec![overnight.clone(), full.clone()];
        let placements = layout_day(day(), &records, &GridGeometry::default());

        let pf = placement_of(&placements, full.id);
        assert!(pf.full_day);
        assert!((pf.height - 1440.0).abs() < f64::EPSILON);
        assert!((pf.width_fraction() - 1.0).abs() < f64::EPSILON);

        let po = placement_of(&placements, overnight.id);
        assert!(po.top.abs() < f64::EPSILON);
        assert!((po.height - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn records_on_other_days_are_ignored() {
        let records = vec![record(22, 9, 22, 10)];
        assert!(layout_day(day(), &records, &GridGeometry::default()).is_empty());
    }
}
