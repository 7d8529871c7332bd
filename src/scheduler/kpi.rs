//! Rota quality metrics (KPIs).
//!
//! Computes coverage and workload indicators from a schedule and the
//! driver/area snapshots it was planned from.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Coverage Rate | Delivered area-weeks / required area-weeks |
//! | Unassigned per Week | Areas with no assignment in that week |
//! | Busy Days | Days a driver delivers, both weeks |
//! | Utilization | Busy days / available days, both weeks |
//! | Multi-day Assignments | Placements spanning two or more days |
//!
//! A weekly area with no pinned week requires two area-weeks; every
//! other area requires one.

use std::collections::{BTreeMap, HashMap};

use crate::models::{DeliveryArea, Driver, Schedule, Week};

/// Rota performance indicators.
#[derive(Debug, Clone)]
pub struct RotaKpi {
    /// Total assignments in the schedule.
    pub assignment_count: usize,
    /// Fraction of required area-weeks delivered (0.0..1.0).
    pub coverage_rate: f64,
    /// Areas without an assignment, per week.
    pub unassigned_by_week: BTreeMap<Week, usize>,
    /// Delivery days per driver across both weeks.
    pub busy_days_by_driver: HashMap<String, u32>,
    /// Per-driver utilization (0.0..1.0).
    pub utilization_by_driver: HashMap<String, f64>,
    /// Average driver utilization (0.0..1.0).
    pub avg_utilization: f64,
    /// Assignments covering two or more days.
    pub multi_day_assignments: usize,
}

impl RotaKpi {
    /// Computes KPIs from a schedule and its input entities.
    ///
    /// # Arguments
    /// * `schedule` - The schedule to evaluate.
    /// * `drivers` - Driver snapshot (for availability).
    /// * `areas` - Area snapshot (for required weeks).
    pub fn calculate(schedule: &Schedule, drivers: &[Driver], areas: &[DeliveryArea]) -> Self {
        let mut required: usize = 0;
        let mut delivered: usize = 0;
        let mut unassigned_by_week: BTreeMap<Week, usize> =
            Week::BOTH.iter().map(|&w| (w, 0)).collect();

        for area in areas {
            required += area.required_weeks();
            let mut weeks_placed = 0;
            for week in Week::BOTH {
                if schedule.assignment_for(&area.id, week).is_some() {
                    weeks_placed += 1;
                } else {
                    *unassigned_by_week.entry(week).or_insert(0) += 1;
                }
            }
            delivered += weeks_placed.min(area.required_weeks());
        }

        let coverage_rate = if required == 0 {
            1.0
        } else {
            delivered as f64 / required as f64
        };

        let mut busy_days_by_driver = HashMap::with_capacity(drivers.len());
        let mut utilization_by_driver = HashMap::with_capacity(drivers.len());
        for driver in drivers {
            let busy: u32 = Week::BOTH
                .iter()
                .map(|&w| schedule.busy_days(&driver.id, w))
                .sum();
            let capacity = driver.available_days.len() * Week::BOTH.len();
            let utilization = if capacity == 0 {
                0.0
            } else {
                f64::from(busy) / capacity as f64
            };
            busy_days_by_driver.insert(driver.id.clone(), busy);
            utilization_by_driver.insert(driver.id.clone(), utilization);
        }

        let avg_utilization = if utilization_by_driver.is_empty() {
            0.0
        } else {
            let sum: f64 = utilization_by_driver.values().sum();
            sum / utilization_by_driver.len() as f64
        };

        let multi_day_assignments = schedule
            .assignments
            .iter()
            .filter(|a| a.delivery_days >= 2)
            .count();

        Self {
            assignment_count: schedule.assignment_count(),
            coverage_rate,
            unassigned_by_week,
            busy_days_by_driver,
            utilization_by_driver,
            avg_utilization,
            multi_day_assignments,
        }
    }

    /// Areas without an assignment in `week`.
    pub fn unassigned_in(&self, week: Week) -> usize {
        self.unassigned_by_week.get(&week).copied().unwrap_or(0)
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_coverage: f64, min_utilization: f64) -> bool {
        self.coverage_rate >= min_coverage && self.avg_utilization >= min_utilization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AreaPriority, Assignment, DaySpan, Weekday};

    fn span(start: Weekday, days: u8) -> DaySpan {
        DaySpan::new(start, days).unwrap()
    }

    fn fixture() -> (Vec<Driver>, Vec<DeliveryArea>) {
        let drivers = vec![
            Driver::new("D1")
                .with_capability(2)
                .with_multi_day_authorization(true),
            Driver::new("D2").with_available_days([Weekday::Monday, Weekday::Tuesday]),
        ];
        let areas = vec![
            DeliveryArea::new("W").with_delivery_days(2),
            DeliveryArea::new("F").with_priority(AreaPriority::Fortnightly),
        ];
        (drivers, areas)
    }

    #[test]
    fn test_kpi_full_coverage() {
        let (drivers, areas) = fixture();
        let mut schedule = Schedule::new();
        schedule.add_assignment(Assignment::new("D1", "W", Week::One, span(Weekday::Monday, 2)));
        schedule.add_assignment(Assignment::new("D1", "W", Week::Two, span(Weekday::Monday, 2)));
        schedule.add_assignment(Assignment::new("D2", "F", Week::One, span(Weekday::Monday, 1)));

        let kpi = RotaKpi::calculate(&schedule, &drivers, &areas);
        assert_eq!(kpi.assignment_count, 3);
        assert!((kpi.coverage_rate - 1.0).abs() < 1e-10);
        assert_eq!(kpi.unassigned_in(Week::One), 0);
        // Fortnightly area is legitimately absent in week 2
        assert_eq!(kpi.unassigned_in(Week::Two), 1);
        assert_eq!(kpi.multi_day_assignments, 2);
    }

    #[test]
    fn test_kpi_partial_coverage() {
        let (drivers, areas) = fixture();
        let mut schedule = Schedule::new();
        schedule.add_assignment(Assignment::new("D1", "W", Week::One, span(Weekday::Monday, 2)));

        let kpi = RotaKpi::calculate(&schedule, &drivers, &areas);
        // 1 of 3 required area-weeks
        assert!((kpi.coverage_rate - 1.0 / 3.0).abs() < 1e-10);
        assert_eq!(kpi.unassigned_in(Week::One), 1);
        assert_eq!(kpi.unassigned_in(Week::Two), 2);
    }

    #[test]
    fn test_kpi_utilization() {
        let (drivers, areas) = fixture();
        let mut schedule = Schedule::new();
        schedule.add_assignment(Assignment::new("D1", "W", Week::One, span(Weekday::Monday, 2)));
        schedule.add_assignment(Assignment::new("D2", "F", Week::Two, span(Weekday::Tuesday, 1)));

        let kpi = RotaKpi::calculate(&schedule, &drivers, &areas);
        assert_eq!(kpi.busy_days_by_driver["D1"], 2);
        // D1: 2 / 10, D2: 1 / 4
        assert!((kpi.utilization_by_driver["D1"] - 0.2).abs() < 1e-10);
        assert!((kpi.utilization_by_driver["D2"] - 0.25).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.225).abs() < 1e-10);
    }

    #[test]
    fn test_kpi_empty() {
        let kpi = RotaKpi::calculate(&Schedule::new(), &[], &[]);
        assert_eq!(kpi.assignment_count, 0);
        assert!((kpi.coverage_rate - 1.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.0).abs() < 1e-10);
        assert_eq!(kpi.unassigned_in(Week::Two), 0);
    }

    #[test]
    fn test_meets_thresholds() {
        let (drivers, areas) = fixture();
        let mut schedule = Schedule::new();
        schedule.add_assignment(Assignment::new("D1", "W", Week::One, span(Weekday::Monday, 2)));

        let kpi = RotaKpi::calculate(&schedule, &drivers, &areas);
        assert!(kpi.meets_thresholds(0.3, 0.0));
        assert!(!kpi.meets_thresholds(0.5, 0.0));
        assert!(!kpi.meets_thresholds(0.0, 0.5));
    }
}
