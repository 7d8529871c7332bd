//! Rota planning and KPI evaluation.
//!
//! Provides the greedy auto-planner and rota quality metrics.
//!
//! # Algorithm
//!
//! `AutoPlanner` runs four priority-ordered first-fit passes: weekly
//! areas, week-1 routes, week-2 routes, then everything else with
//! round-robin week balancing. It is not optimal, but it is fast and
//! fully deterministic.
//!
//! # KPI
//!
//! `RotaKpi` computes coverage, unassigned counts per week, and driver
//! utilization.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod kpi;
mod planner;

pub use kpi::RotaKpi;
pub use planner::{AutoPlanner, PlanOutcome, PlanRequest};
