//! # pto-planner
//!
//! Scheduling core for a team calendar with PTO (paid time off) planning.
//!
//! The crate owns the calendar state and the logic a week-grid UI needs:
//! which records fall in the visible week, whether a time range is free,
//! where a dragged or resized block snaps to, how overlapping blocks share
//! a day column, and how many PTO hours each user has booked. Rendering is
//! left to the consumer; aggregates serialize to JSON via `serde`.
//!
//! ## Architecture
//!
//! ```text
//! Pointer / form / navigation input
//!     │
//!     ├── PlannerService (service/)
//!     │       gesture state, week navigation, form submission
//!     │
//!     ├── schedule/
//!     │       week · availability · grid · layout · stats
//!     │
//!     ├── EventStore (domain/)
//!     │       records, users, holidays
//!     │
//!     └── EventBus → StoreSubscription
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod schedule;
pub mod service;
