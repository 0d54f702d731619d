//! Service layer: planner session orchestration.
//!
//! [`PlannerService`] owns the [`crate::domain::EventStore`], tracks the
//! visible week and the active pointer gesture, and turns form input and
//! pointer coordinates into store mutations.

pub mod form;
pub mod planner_service;

pub use form::RecordForm;
pub use planner_service::{Gesture, PlannerService};
