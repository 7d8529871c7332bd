//! Two-week delivery rota allocator.
//!
//! Assigns delivery areas to drivers across a two-week rotating calendar
//! of five working days, without double-booking any driver and while
//! honouring availability, capability, multi-day authorization and
//! consecutive-route constraints.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Driver`, `DeliveryArea`, `Schedule`,
//!   `Assignment`, `PlanIssue`, `Weekday`, `Week`, `DaySpan`
//! - **`feasibility`**: Placement rules shared by the planner and manual edits
//! - **`routes`**: Consecutive route resolution over the link graph
//! - **`scheduler`**: Greedy multi-pass `AutoPlanner` and `RotaKpi`
//! - **`grid`**: `ScheduleGrid`, the editable driver × weekday × week table
//! - **`validation`**: Input integrity checks (duplicate IDs, spans, links)
//! - **`error`**: Placement and persisted-schedule errors
//!
//! # Architecture
//!
//! Entity snapshots flow into the planner, which builds a complete
//! replacement `Schedule` off-grid; the grid swaps it in and serves
//! renderers. Storage, networking and presentation live outside the crate.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review"

pub mod error;
pub mod feasibility;
pub mod grid;
pub mod models;
pub mod routes;
pub mod scheduler;
pub mod validation;
