//! Planner service: orchestrates the week view, gestures and form flows.

use chrono::NaiveDate;
use serde::Serialize;

use super::form::RecordForm;
use crate::config::PlannerConfig;
use crate::domain::{
    EventBus, EventStore, NewRecord, PtoRecord, RecordCategory, RecordId, RecordStatus,
    StoreSubscription, SubscriptionFilter, TimeRange, User, UserId,
};
use crate::error::PlannerResult;
use crate::schedule::week::DAYS_PER_WEEK;
use crate::schedule::{
    EventPlacement, Navigation, PtoStatistics, SlotFinder, TeamMemberSummary, WeekWindow,
    WorkingHours, aggregate, compute_week, find_conflicts, is_range_available, layout_day, month_grid,
    navigate, team_summary,
};

/// The pointer gesture in progress, if any.
///
/// Holds a copy of the record's range as it was when the gesture began;
/// every pointer move is applied relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Gesture {
    /// Moving a record to another slot.
    Drag {
        /// Record being moved.
        record_id: RecordId,
        /// Pointer distance below the record's top edge.
        offset_y: f64,
        /// Range before the drag.
        original: TimeRange,
    },
    /// Stretching a record from its bottom edge.
    Resize {
        /// Record being resized.
        record_id: RecordId,
        /// Pointer position when the resize began.
        start_y: f64,
        /// Block height when the resize began.
        original_height: f64,
        /// Range before the resize.
        original: TimeRange,
    },
}

impl Gesture {
    /// The record the gesture acts on.
    #[must_use]
    pub const fn record_id(&self) -> RecordId {
        match self {
            Self::Drag { record_id, .. } | Self::Resize { record_id, .. } => *record_id,
        }
    }
}

/// Orchestration layer for a planner session.
///
/// Owns the [`EventStore`] and the view state (reference date, active
/// gesture). Every mutation goes through the store, which publishes the
/// matching [`crate::domain::StoreEvent`].
#[derive(Debug)]
pub struct PlannerService {
    store: EventStore,
    config: PlannerConfig,
    reference_date: NaiveDate,
    gesture: Option<Gesture>,
}

impl PlannerService {
    /// Creates a service with an empty store showing the week of
    /// `reference_date`.
    #[must_use]
    pub fn new(config: PlannerConfig, reference_date: NaiveDate) -> Self {
        let store = EventStore::new(EventBus::new(config.event_bus_capacity));
        Self::with_store(config, store, reference_date)
    }

    /// Creates a service around an existing store.
    #[must_use]
    pub fn with_store(config: PlannerConfig, store: EventStore, reference_date: NaiveDate) -> Self {
        Self {
            store,
            config,
            reference_date,
            gesture: None,
        }
    }

    /// Returns a reference to the inner [`EventStore`].
    #[must_use]
    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Returns the inner [`EventStore`] for direct mutation.
    pub fn store_mut(&mut self) -> &mut EventStore {
        &mut self.store
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Subscribes to store changes matching `filter`.
    #[must_use]
    pub fn subscribe(&self, filter: SubscriptionFilter) -> StoreSubscription {
        self.store.subscribe(filter)
    }

    // ---------------------------
    // Week view
    // ---------------------------

    /// The date whose week is displayed.
    #[must_use]
    pub const fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    /// Jumps to the week containing `date`.
    pub fn set_reference_date(&mut self, date: NaiveDate) {
        self.reference_date = date;
    }

    /// The visible week.
    #[must_use]
    pub fn current_week(&self) -> WeekWindow {
        compute_week(self.reference_date, self.config.week_starts_on)
    }

    /// Applies a header navigation command and returns the new week.
    pub fn navigate(&mut self, nav: Navigation, today: NaiveDate) -> WeekWindow {
        self.reference_date = navigate(self.reference_date, nav, today);
        let week = self.current_week();
        tracing::debug!(?nav, week = %week, "week changed");
        week
    }

    /// Mini-calendar days for the reference month.
    #[must_use]
    pub fn month_grid(&self) -> Vec<NaiveDate> {
        month_grid(self.reference_date, self.config.week_starts_on)
    }

    /// Records touching the visible week, in store order.
    #[must_use]
    pub fn week_records(&self) -> Vec<&PtoRecord> {
        self.current_week().filter(self.store.records())
    }

    /// Records of the visible week split into day columns.
    #[must_use]
    pub fn week_buckets(&self) -> [Vec<&PtoRecord>; DAYS_PER_WEEK] {
        self.current_week().bucket(self.store.records())
    }

    /// Lane placements for one day column; empty for an out-of-range index.
    #[must_use]
    pub fn layout_day(&self, day_index: usize) -> Vec<EventPlacement> {
        self.current_week()
            .day(day_index)
            .map(|date| layout_day(date, self.store.records(), &self.config.geometry))
            .unwrap_or_default()
    }

    // ---------------------------
    // Records
    // ---------------------------

    /// Adds a team member with the configured default allowance.
    pub fn add_team_member(&mut self, name: impl Into<String>) -> UserId {
        self.store
            .add_user(User::new(name, self.config.default_allowance_hours))
    }

    /// Parses a submitted form and stores the resulting pending record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PlannerError::UnknownUser`] if the form names a
    /// user not in the store, or the form's validation error.
    pub fn submit_form(&mut self, form: &RecordForm) -> PlannerResult<RecordId> {
        let new = {
            let user = self.store.require_user(form.user_id()?)?;
            form.to_new_record(user)?
        };
        self.store.add_record(new)
    }

    /// Returns `true` if `range` overlaps no stored record.
    #[must_use]
    pub fn is_available(&self, range: &TimeRange) -> bool {
        is_range_available(range.start(), range.end(), self.store.records())
    }

    /// Records that overlap `range`.
    #[must_use]
    pub fn conflicts(&self, range: &TimeRange) -> Vec<&PtoRecord> {
        find_conflicts(range, self.store.records())
    }

    /// Earliest free slot of `duration_minutes` in the visible week,
    /// stepping on the snap grid inside working hours.
    #[must_use]
    pub fn suggest_slot(&self, duration_minutes: u32) -> Option<TimeRange> {
        SlotFinder::new(
            &self.config.working_hours,
            self.store.holidays(),
            self.config.geometry.snap_minutes(),
        )
        .suggest(&self.current_week(), duration_minutes, self.store.records())
    }

    /// Replaces the working days and hours used for suggestions.
    pub fn set_working_hours(&mut self, hours: WorkingHours) {
        tracing::info!(
            start_hour = hours.start_hour(),
            end_hour = hours.end_hour(),
            days = ?hours.days(),
            "working hours changed"
        );
        self.config.working_hours = hours;
    }

    /// Books a suggested slot for `user_id` as a pending `auto` record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::PlannerError::UnknownUser`] if the user is not
    /// in the store.
    pub fn accept_suggestion(&mut self, user_id: UserId, range: TimeRange) -> PlannerResult<RecordId> {
        let new = NewRecord::for_user(self.store.require_user(user_id)?, range, RecordCategory::Auto);
        let record_id = self.store.add_record(new)?;
        tracing::info!(%record_id, %user_id, "suggestion accepted");
        Ok(record_id)
    }

    /// Deletes a record. Clears the active gesture if it targeted it.
    pub fn delete_record(&mut self, record_id: RecordId) -> Option<PtoRecord> {
        if self.gesture.is_some_and(|g| g.record_id() == record_id) {
            self.gesture = None;
        }
        self.store.remove_record(record_id)
    }

    /// Changes a record's approval state.
    pub fn set_status(&mut self, record_id: RecordId, status: RecordStatus) -> bool {
        self.store.set_status(record_id, status)
    }

    // ---------------------------
    // Statistics
    // ---------------------------

    /// Hour statistics over every stored record.
    #[must_use]
    pub fn statistics(&self) -> PtoStatistics {
        aggregate(self.store.records())
    }

    /// Hour statistics over the visible week's records.
    #[must_use]
    pub fn week_statistics(&self) -> PtoStatistics {
        aggregate(self.week_records())
    }

    /// One summary row per user.
    #[must_use]
    pub fn team_summary(&self) -> Vec<TeamMemberSummary> {
        team_summary(self.store.users(), self.store.records())
    }

    // ---------------------------
    // Gestures
    // ---------------------------

    /// The gesture in progress.
    #[must_use]
    pub const fn active_gesture(&self) -> Option<&Gesture> {
        self.gesture.as_ref()
    }

    /// Starts dragging `record_id` with the pointer at `pointer_y`.
    ///
    /// Replaces any active gesture. Returns `false` if the record does not
    /// exist or its range is inverted.
    pub fn begin_drag(&mut self, record_id: RecordId, pointer_y: f64) -> bool {
        let Some(original) = self.original_range(record_id) else {
            return false;
        };
        let offset_y = pointer_y - self.config.geometry.top_of(original.start());
        self.gesture = Some(Gesture::Drag {
            record_id,
            offset_y,
            original,
        });
        tracing::debug!(%record_id, offset_y, "drag started");
        true
    }

    /// Starts resizing `record_id` from its bottom edge at `pointer_y`.
    ///
    /// Replaces any active gesture. Returns `false` if the record does not
    /// exist or its range is inverted.
    #[allow(clippy::cast_precision_loss)]
    pub fn begin_resize(&mut self, record_id: RecordId, pointer_y: f64) -> bool {
        let Some(original) = self.original_range(record_id) else {
            return false;
        };
        let original_height = self
            .config
            .geometry
            .minutes_to_pixels(original.duration().num_minutes() as f64);
        self.gesture = Some(Gesture::Resize {
            record_id,
            start_y: pointer_y,
            original_height,
            original,
        });
        tracing::debug!(%record_id, original_height, "resize started");
        true
    }

    /// Applies a pointer move to the active gesture.
    ///
    /// Returns `true` if the record's range changed. Moves without an
    /// active gesture, or whose record has gone, change nothing.
    pub fn pointer_move(&mut self, pixel_x: f64, pixel_y: f64) -> bool {
        let Some(gesture) = self.gesture else {
            return false;
        };
        let geometry = self.config.geometry;
        let (record_id, range) = match gesture {
            Gesture::Drag {
                record_id,
                offset_y,
                original,
            } => {
                let slot = geometry.pixel_to_slot(pixel_y - offset_y, pixel_x);
                let Some(range) = geometry.move_range(original, slot, &self.current_week()) else {
                    return false;
                };
                (record_id, range)
            }
            Gesture::Resize {
                record_id,
                start_y,
                original_height,
                original,
            } => {
                let height = original_height + (pixel_y - start_y);
                (record_id, geometry.resize_by_pixels(original, height))
            }
        };
        let changed = self.store.reschedule(record_id, range);
        if changed {
            tracing::debug!(%record_id, start = %range.start(), end = %range.end(), "gesture applied");
        }
        changed
    }

    /// Ends the active gesture (pointer up or pointer leaving the grid).
    ///
    /// Returns the gesture that was active.
    pub fn end_gesture(&mut self) -> Option<Gesture> {
        let gesture = self.gesture.take();
        if let Some(g) = &gesture {
            tracing::debug!(record_id = %g.record_id(), "gesture ended");
        }
        gesture
    }

    fn original_range(&self, record_id: RecordId) -> Option<TimeRange> {
        self.store.record(record_id)?.range().ok()
    }
}
