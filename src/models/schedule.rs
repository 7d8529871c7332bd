//! Schedule (solution) model.
//!
//! A schedule is the full list of driver-area-span assignments for the
//! two-week rotation plus a modification timestamp. It is the only
//! document the rota core persists, always as one unit.
//!
//! Planner outcomes that are not assignments (areas left unplaced,
//! route groups that could not be routed) are reported as `PlanIssue`s.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DaySpan, Week, Weekday};

/// Default document name.
pub const DEFAULT_SCHEDULE_NAME: &str = "Current Schedule";

/// A complete rota schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Document name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Assignments, in creation order.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A driver delivering one area over a span of days in one week.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Assigned driver ID.
    pub driver_id: String,
    /// Delivered area ID.
    pub delivery_area_id: String,
    /// Rotation week.
    pub week: Week,
    /// First day (inclusive).
    pub start_day: Weekday,
    /// Last day (inclusive).
    pub end_day: Weekday,
    /// Span length; equals `end_day - start_day + 1`.
    pub delivery_days: u8,
}

/// A non-fatal planner outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanIssue {
    /// Kind of issue.
    pub issue_type: PlanIssueType,
    /// Areas concerned, in route order for group issues.
    pub area_ids: Vec<String>,
    /// Human-readable description.
    pub message: String,
}

/// Classification of planner issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanIssueType {
    /// No driver/start day satisfied the placement rules in these weeks.
    NoFeasiblePlacement { weeks: Vec<Week> },
    /// The `consecutive_with` links of a route group form a cycle.
    CyclicRouteGroup,
    /// Route group members are pinned to different weeks, or only some are pinned.
    MixedRouteWeek,
    /// No member of the route group is pinned to a week.
    UnpinnedRoute,
}

fn default_name() -> String {
    DEFAULT_SCHEDULE_NAME.to_string()
}

impl Assignment {
    /// Creates an assignment covering `span`.
    pub fn new(
        driver_id: impl Into<String>,
        delivery_area_id: impl Into<String>,
        week: Week,
        span: DaySpan,
    ) -> Self {
        Self {
            driver_id: driver_id.into(),
            delivery_area_id: delivery_area_id.into(),
            week,
            start_day: span.start(),
            end_day: span.end(),
            delivery_days: span.days(),
        }
    }

    /// The covered span, or `None` if the stored days are inconsistent.
    pub fn span(&self) -> Option<DaySpan> {
        DaySpan::new(self.start_day, self.delivery_days).filter(|s| s.end() == self.end_day)
    }

    /// Whether `day` lies within `[start_day, end_day]`.
    #[inline]
    pub fn covers(&self, day: Weekday) -> bool {
        day >= self.start_day && day <= self.end_day
    }

    /// Whether this is the assignment of `area_id` in `week`.
    #[inline]
    pub fn is_for(&self, area_id: &str, week: Week) -> bool {
        self.delivery_area_id == area_id && self.week == week
    }
}

impl PlanIssue {
    /// Creates a no-feasible-placement issue for one area.
    pub fn no_feasible_placement(area_id: impl Into<String>, weeks: Vec<Week>) -> Self {
        let area_id = area_id.into();
        let message = format!(
            "No driver could take '{}' in {}",
            area_id,
            describe_weeks(&weeks)
        );
        Self {
            issue_type: PlanIssueType::NoFeasiblePlacement { weeks },
            area_ids: vec![area_id],
            message,
        }
    }

    /// Creates a no-feasible-placement issue for a whole route group.
    pub fn route_unplaced(area_ids: Vec<String>, week: Week) -> Self {
        let message = format!(
            "No driver could take route [{}] in {}",
            area_ids.join(", "),
            week
        );
        Self {
            issue_type: PlanIssueType::NoFeasiblePlacement { weeks: vec![week] },
            area_ids,
            message,
        }
    }

    /// Creates a cyclic route group issue.
    pub fn cyclic_route(area_ids: Vec<String>) -> Self {
        let message = format!(
            "Consecutive links of [{}] form a cycle; route excluded from planning",
            area_ids.join(", ")
        );
        Self {
            issue_type: PlanIssueType::CyclicRouteGroup,
            area_ids,
            message,
        }
    }

    /// Creates a mixed-week route group issue.
    pub fn mixed_route_week(area_ids: Vec<String>) -> Self {
        let message = format!(
            "Route [{}] members do not share one pinned week; route excluded from planning",
            area_ids.join(", ")
        );
        Self {
            issue_type: PlanIssueType::MixedRouteWeek,
            area_ids,
            message,
        }
    }

    /// Creates an unpinned route group issue.
    pub fn unpinned_route(area_ids: Vec<String>) -> Self {
        let message = format!(
            "Route [{}] is not pinned to a week; route excluded from planning",
            area_ids.join(", ")
        );
        Self {
            issue_type: PlanIssueType::UnpinnedRoute,
            area_ids,
            message,
        }
    }

    /// Whether the issue concerns `area_id`.
    pub fn concerns(&self, area_id: &str) -> bool {
        self.area_ids.iter().any(|id| id == area_id)
    }
}

fn describe_weeks(weeks: &[Week]) -> String {
    match weeks {
        [week] => week.to_string(),
        _ => "both weeks".to_string(),
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

impl Schedule {
    /// Creates an empty schedule stamped with the current time.
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Creates an empty schedule stamped with `updated_at`.
    pub fn at(updated_at: DateTime<Utc>) -> Self {
        Self {
            name: default_name(),
            assignments: Vec::new(),
            updated_at,
        }
    }

    /// Sets the document name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends an assignment.
    pub fn add_assignment(&mut self, assignment: Assignment) {
        self.assignments.push(assignment);
    }

    /// Refreshes the modification timestamp.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    /// Whether there are no assignments.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// The assignment of `area_id` in `week`, if any.
    pub fn assignment_for(&self, area_id: &str, week: Week) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.is_for(area_id, week))
    }

    /// All assignments of a driver, both weeks.
    pub fn assignments_for_driver(&self, driver_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.driver_id == driver_id)
            .collect()
    }

    /// All assignments of an area, both weeks.
    pub fn assignments_for_area(&self, area_id: &str) -> Vec<&Assignment> {
        self.assignments
            .iter()
            .filter(|a| a.delivery_area_id == area_id)
            .collect()
    }

    /// All assignments in one week.
    pub fn assignments_in_week(&self, week: Week) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter().filter(move |a| a.week == week)
    }

    /// Days a driver is busy in `week`.
    pub fn busy_days(&self, driver_id: &str, week: Week) -> u32 {
        self.assignments_in_week(week)
            .filter(|a| a.driver_id == driver_id)
            .map(|a| u32::from(a.delivery_days))
            .sum()
    }
}
