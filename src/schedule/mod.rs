//! Scheduling logic: pure functions over records and pixels.
//!
//! - [`week`]: the visible 7-day window, navigation and month grids.
//! - [`availability`]: half-open overlap checks and free-slot suggestions.
//! - [`grid`]: pointer pixel ↔ time-slot mapping, drag and resize snapping.
//! - [`layout`]: side-by-side placement of overlapping records in a day.
//! - [`stats`]: hour aggregates and the team summary.

pub mod availability;
pub mod grid;
pub mod layout;
pub mod stats;
pub mod week;

pub use availability::{SlotFinder, WorkingHours, find_conflicts, is_range_available};
pub use grid::{GridGeometry, PixelPoint, Slot};
pub use layout::{EventPlacement, layout_day};
pub use stats::{PtoStatistics, TeamMemberSummary, aggregate, team_summary};
pub use week::{Navigation, WeekStart, WeekWindow, compute_week, month_grid, navigate};
