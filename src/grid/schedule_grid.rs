//! Manual-edit surface over a schedule.
//!
//! Holds the entity snapshots, the schedule document and its occupancy
//! table. Edits are remove-then-insert and run the same placement rules
//! as the auto-planner.
//!
//! Single editor, last writer wins: the grid is an owned value mutated
//! through `&mut self`, with no locking or version checks.

use std::collections::HashSet;

use tracing::debug;

use super::Occupancy;
use crate::error::{PlacementError, ScheduleError};
use crate::feasibility::{check_placement, check_placement_replacing};
use crate::models::{
    AreaPriority, Assignment, DeliveryArea, Driver, PlanIssue, Schedule, Week, Weekday,
};
use crate::scheduler::{AutoPlanner, PlanRequest};

/// A schedule plus the entities it refers to.
///
/// # Example
/// ```
/// use delivery_rota::grid::ScheduleGrid;
/// use delivery_rota::models::{DeliveryArea, Driver, Week, Weekday};
///
/// let drivers = vec![Driver::new("D1").with_name("Sam")];
/// let areas = vec![
///     DeliveryArea::new("A1").with_name("Coast").with_postcodes(["NE30"]),
///     DeliveryArea::new("A2").with_name("Valley").with_postcodes(["NE40"]),
/// ];
/// let mut grid = ScheduleGrid::new(drivers, areas);
///
/// grid.place("D1", "A1", Week::One, Weekday::Monday).unwrap();
/// // D1 is busy on Monday of week 1
/// assert!(grid.place("D1", "A2", Week::One, Weekday::Monday).is_err());
/// assert_eq!(grid.unassigned_for(Week::One).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ScheduleGrid {
    drivers: Vec<Driver>,
    areas: Vec<DeliveryArea>,
    schedule: Schedule,
    occupancy: Occupancy,
}

/// What a renderer should draw in one driver/day/week cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell<'g> {
    /// First day of an assignment; spans `assignment.delivery_days` columns.
    Start(&'g Assignment),
    /// A later day of a multi-day assignment, merged into its start cell.
    Continuation(&'g Assignment),
    /// The driver works this day and has nothing scheduled.
    Free,
    /// The driver does not work this day.
    Unavailable,
}

impl ScheduleGrid {
    /// Creates a grid with an empty schedule.
    pub fn new(drivers: Vec<Driver>, areas: Vec<DeliveryArea>) -> Self {
        Self {
            drivers,
            areas,
            schedule: Schedule::new(),
            occupancy: Occupancy::new(),
        }
    }

    /// Creates a grid over a persisted schedule.
    ///
    /// Rejects documents that reference unknown entities, carry spans
    /// inconsistent with their area, double-book a driver or an area,
    /// run a fortnightly area in both weeks, or break a placement rule
    /// (availability, capability, multi-day authorization).
    pub fn load(
        drivers: Vec<Driver>,
        areas: Vec<DeliveryArea>,
        schedule: Schedule,
    ) -> Result<Self, ScheduleError> {
        let mut occupancy = Occupancy::new();
        let mut placed: HashSet<(&str, Week)> = HashSet::new();

        for a in &schedule.assignments {
            let driver = drivers
                .iter()
                .find(|d| d.id == a.driver_id)
                .ok_or_else(|| ScheduleError::UnknownDriver(a.driver_id.clone()))?;
            let area = areas
                .iter()
                .find(|ar| ar.id == a.delivery_area_id)
                .ok_or_else(|| ScheduleError::UnknownArea(a.delivery_area_id.clone()))?;
            if a.delivery_days != area.delivery_days {
                return Err(ScheduleError::InvalidSpan {
                    area_id: a.delivery_area_id.clone(),
                    week: a.week,
                    reason: format!(
                        "{} day(s) scheduled, area needs {}",
                        a.delivery_days, area.delivery_days
                    ),
                });
            }
            let span = a.span().ok_or_else(|| ScheduleError::InvalidSpan {
                area_id: a.delivery_area_id.clone(),
                week: a.week,
                reason: format!(
                    "{} to {} is not {} day(s)",
                    a.start_day, a.end_day, a.delivery_days
                ),
            })?;

            if !placed.insert((a.delivery_area_id.as_str(), a.week)) {
                return Err(ScheduleError::DuplicateAssignment {
                    area_id: a.delivery_area_id.clone(),
                    week: a.week,
                });
            }
            if area.priority == AreaPriority::Fortnightly
                && placed.contains(&(a.delivery_area_id.as_str(), a.week.other()))
            {
                return Err(ScheduleError::FortnightlyInBothWeeks {
                    area_id: a.delivery_area_id.clone(),
                });
            }
            if let Some((day, existing)) = occupancy.first_conflict(&a.driver_id, a.week, span, None)
            {
                return Err(ScheduleError::Overlap {
                    driver_id: a.driver_id.clone(),
                    week: a.week,
                    day,
                    first_area_id: existing.to_string(),
                    second_area_id: a.delivery_area_id.clone(),
                });
            }
            check_placement(driver, area, a.week, a.start_day, &occupancy).map_err(|source| {
                ScheduleError::RuleViolation {
                    area_id: a.delivery_area_id.clone(),
                    week: a.week,
                    source,
                }
            })?;

            occupancy.occupy(&a.driver_id, a.week, span, &a.delivery_area_id);
        }

        Ok(Self {
            drivers,
            areas,
            schedule,
            occupancy,
        })
    }

    /// The current schedule document.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Consumes the grid, returning the schedule document.
    pub fn into_schedule(self) -> Schedule {
        self.schedule
    }

    /// Driver snapshot.
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    /// Delivery area snapshot.
    pub fn areas(&self) -> &[DeliveryArea] {
        &self.areas
    }

    /// Looks up a driver.
    pub fn driver(&self, driver_id: &str) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == driver_id)
    }

    /// Looks up a delivery area.
    pub fn area(&self, area_id: &str) -> Option<&DeliveryArea> {
        self.areas.iter().find(|a| a.id == area_id)
    }

    /// Places `area_id` on `driver_id` in `week`, starting on `start_day`.
    ///
    /// Runs the placement rules against the current grid. On success any
    /// existing assignment of the area in that week is replaced. On
    /// failure the grid is unchanged.
    ///
    /// Fortnightly areas already scheduled in the other week are rejected.
    pub fn place(
        &mut self,
        driver_id: &str,
        area_id: &str,
        week: Week,
        start_day: Weekday,
    ) -> Result<&Assignment, PlacementError> {
        let driver = self
            .drivers
            .iter()
            .find(|d| d.id == driver_id)
            .ok_or_else(|| PlacementError::UnknownDriver(driver_id.to_string()))?;
        let area = self
            .areas
            .iter()
            .find(|a| a.id == area_id)
            .ok_or_else(|| PlacementError::UnknownArea(area_id.to_string()))?;

        let span = check_placement_replacing(
            driver,
            area,
            week,
            start_day,
            &self.occupancy,
            Some(area_id),
        )?;

        if area.priority == AreaPriority::Fortnightly
            && self.schedule.assignment_for(area_id, week.other()).is_some()
        {
            return Err(PlacementError::FortnightlyConflict {
                area_id: area_id.to_string(),
                scheduled_week: week.other(),
            });
        }

        self.detach(|a| a.is_for(area_id, week));

        let assignment = Assignment::new(driver_id, area_id, week, span);
        self.occupancy.occupy(driver_id, week, span, area_id);
        self.schedule.add_assignment(assignment);
        self.schedule.touch();

        debug!(
            driver_id,
            area_id,
            week = week.number(),
            span = %span,
            "Placed delivery area"
        );

        Ok(&self.schedule.assignments[self.schedule.assignments.len() - 1])
    }

    /// Removes the assignment of `area_id` on `driver_id` in `week`.
    ///
    /// Returns the removed assignment; `None` (and no change) if absent.
    pub fn remove(&mut self, driver_id: &str, area_id: &str, week: Week) -> Option<Assignment> {
        let removed = self.detach(|a| a.driver_id == driver_id && a.is_for(area_id, week));
        if removed.is_empty() {
            return None;
        }
        self.schedule.touch();
        debug!(driver_id, area_id, week = week.number(), "Removed assignment");
        removed.into_iter().next()
    }

    /// Removes every assignment.
    pub fn clear(&mut self) {
        self.schedule.assignments.clear();
        self.occupancy.clear();
        self.schedule.touch();
    }

    /// The assignment covering `day` for a driver in `week`, if any.
    pub fn occupancy_at(&self, driver_id: &str, day: Weekday, week: Week) -> Option<&Assignment> {
        self.schedule
            .assignments_in_week(week)
            .find(|a| a.driver_id == driver_id && a.covers(day))
    }

    /// Classifies one cell of the driver × weekday table.
    pub fn cell(&self, driver_id: &str, day: Weekday, week: Week) -> GridCell<'_> {
        if let Some(a) = self.occupancy_at(driver_id, day, week) {
            return if a.start_day == day {
                GridCell::Start(a)
            } else {
                GridCell::Continuation(a)
            };
        }
        match self.driver(driver_id) {
            Some(d) if d.is_available_on(day) => GridCell::Free,
            _ => GridCell::Unavailable,
        }
    }

    /// Areas with no assignment in `week`, in snapshot order.
    pub fn unassigned_for(&self, week: Week) -> Vec<&DeliveryArea> {
        self.areas
            .iter()
            .filter(|area| self.schedule.assignment_for(&area.id, week).is_none())
            .collect()
    }

    /// Replaces the whole schedule with a fresh auto-plan.
    ///
    /// The schedule name is kept. If the plan cannot be installed the
    /// previous schedule stays in place and the error is returned.
    pub fn replan(&mut self, planner: &AutoPlanner) -> Result<Vec<PlanIssue>, ScheduleError> {
        let request = PlanRequest::new(self.drivers.clone(), self.areas.clone())
            .with_schedule_name(self.schedule.name.clone());
        let outcome = planner.plan_request(&request);
        let occupancy = Occupancy::from_assignments(&outcome.schedule.assignments)?;

        self.schedule = outcome.schedule;
        self.occupancy = occupancy;
        Ok(outcome.issues)
    }

    /// Removes matching assignments and frees their slots.
    fn detach<F>(&mut self, matches: F) -> Vec<Assignment>
    where
        F: Fn(&Assignment) -> bool,
    {
        let (removed, kept): (Vec<Assignment>, Vec<Assignment>) = self
            .schedule
            .assignments
            .drain(..)
            .partition(|a| matches(a));
        self.schedule.assignments = kept;
        for a in &removed {
            if let Some(span) = a.span() {
                self.occupancy
                    .release(&a.driver_id, a.week, span, &a.delivery_area_id);
            }
        }
        removed
    }
}
