//! Schedule grid: the assignment list behind the driver × weekday × week table.
//!
//! The grid is both the holder of the auto-planner's output and the
//! surface for manual edits. Every mutation keeps the no-overlap
//! invariant; rejected edits leave the grid untouched.
//!
//! Renderers query `occupancy_at`, `cell` and `unassigned_for`.

mod occupancy;
mod schedule_grid;

pub use occupancy::Occupancy;
pub use schedule_grid::{GridCell, ScheduleGrid};
