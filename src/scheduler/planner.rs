//! Multi-pass greedy rota planner.
//!
//! # Algorithm
//!
//! Four ordered passes over a fresh schedule, sharing one occupancy
//! table so later passes see earlier commitments:
//!
//! 1. Standalone weekly areas with no pinned week: the first
//!    (driver, start day) free in **both** weeks; placed twice.
//! 2. Consecutive routes pinned to week 1: the first (driver, start day)
//!    able to run the whole route; members placed back-to-back.
//! 3. The same for routes pinned to week 2.
//! 4. Remaining standalone areas, one week each: the pinned week, or a
//!    round-robin week alternating 1/2 across unpinned areas.
//!
//! Drivers are tried P1 first, then by descending capability. Areas are
//! tried weekly first, then by descending span. Start days are tried
//! Monday to Friday. The first fit wins; there is no backtracking, and
//! an area that doesn't fit in its pass stays unplaced for the run.
//!
//! # Complexity
//! O(a × d × 5) for a areas and d drivers.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::feasibility::{can_place, can_place_route, check_placement};
use crate::grid::Occupancy;
use crate::models::{
    Assignment, DaySpan, DeliveryArea, Driver, PlanIssue, Schedule, Week, Weekday,
    DEFAULT_SCHEDULE_NAME,
};
use crate::routes::{RouteGraph, RouteGroup};

/// Input container for planning.
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Driver snapshot.
    pub drivers: Vec<Driver>,
    /// Delivery area snapshot.
    pub areas: Vec<DeliveryArea>,
    /// Name given to the produced schedule.
    pub schedule_name: String,
    /// First round-robin week. `None` = the planner's setting.
    pub balance_start: Option<Week>,
    /// Timestamp for the produced schedule. `None` = now.
    pub planned_at: Option<DateTime<Utc>>,
}

impl PlanRequest {
    /// Creates a new plan request.
    pub fn new(drivers: Vec<Driver>, areas: Vec<DeliveryArea>) -> Self {
        Self {
            drivers,
            areas,
            schedule_name: DEFAULT_SCHEDULE_NAME.to_string(),
            balance_start: None,
            planned_at: None,
        }
    }

    /// Sets the schedule name.
    pub fn with_schedule_name(mut self, name: impl Into<String>) -> Self {
        self.schedule_name = name.into();
        self
    }

    /// Overrides the first round-robin week.
    pub fn with_balance_start(mut self, week: Week) -> Self {
        self.balance_start = Some(week);
        self
    }

    /// Fixes the schedule timestamp.
    pub fn with_planned_at(mut self, at: DateTime<Utc>) -> Self {
        self.planned_at = Some(at);
        self
    }
}

/// Result of a planning run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    /// The replacement schedule.
    pub schedule: Schedule,
    /// Areas and routes that could not be placed, and why.
    pub issues: Vec<PlanIssue>,
}

impl PlanOutcome {
    /// Whether every area was placed.
    pub fn is_complete(&self) -> bool {
        self.issues.is_empty()
    }

    /// IDs of areas named by any issue, without duplicates.
    pub fn unplaced_area_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in self.issues.iter().flat_map(|i| i.area_ids.iter()) {
            if !ids.contains(&id.as_str()) {
                ids.push(id);
            }
        }
        ids
    }
}

/// Deterministic greedy rota planner.
///
/// # Example
///
/// ```
/// use delivery_rota::scheduler::AutoPlanner;
/// use delivery_rota::models::{DeliveryArea, Driver, Week, Weekday};
///
/// let drivers = vec![Driver::new("D1").with_name("Sam")];
/// let areas = vec![DeliveryArea::new("A1").with_name("Coast").with_postcodes(["NE30"])];
///
/// let outcome = AutoPlanner::new().plan(&drivers, &areas);
/// assert!(outcome.is_complete());
///
/// // Weekly area: same day in both weeks
/// let placed = outcome.schedule.assignments_for_area("A1");
/// assert_eq!(placed.len(), 2);
/// assert!(placed.iter().all(|a| a.start_day == Weekday::Monday));
/// assert_eq!(placed[1].week, Week::Two);
/// ```
#[derive(Debug, Clone)]
pub struct AutoPlanner {
    balance_start: Week,
}

/// Working state of one run. All placements go through `commit`.
struct PlanState {
    schedule: Schedule,
    occupancy: Occupancy,
    issues: Vec<PlanIssue>,
}

impl PlanState {
    fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            occupancy: Occupancy::new(),
            issues: Vec::new(),
        }
    }

    fn commit(&mut self, driver: &Driver, area: &DeliveryArea, week: Week, span: DaySpan) {
        debug!(
            driver_id = %driver.id,
            area_id = %area.id,
            week = week.number(),
            span = %span,
            "Committed placement"
        );
        self.occupancy.occupy(&driver.id, week, span, &area.id);
        self.schedule
            .add_assignment(Assignment::new(&driver.id, &area.id, week, span));
    }

    fn is_assigned(&self, area_id: &str) -> bool {
        self.schedule
            .assignments
            .iter()
            .any(|a| a.delivery_area_id == area_id)
    }

    fn report(&mut self, issue: PlanIssue) {
        debug!(area_ids = ?issue.area_ids, "{}", issue.message);
        self.issues.push(issue);
    }
}

/// Tries drivers in order, start days Monday to Friday; first fit wins.
fn first_fit<'d, F>(drivers: &[&'d Driver], fits: F) -> Option<(&'d Driver, DaySpan)>
where
    F: Fn(&Driver, Weekday) -> Option<DaySpan>,
{
    drivers.iter().find_map(|&driver| {
        Weekday::ALL
            .iter()
            .find_map(|&day| fits(driver, day).map(|span| (driver, span)))
    })
}

impl AutoPlanner {
    /// Creates a planner. Round-robin balancing starts at week 1.
    pub fn new() -> Self {
        Self {
            balance_start: Week::One,
        }
    }

    /// Sets the first week handed out by round-robin balancing.
    pub fn with_balance_start(mut self, week: Week) -> Self {
        self.balance_start = week;
        self
    }

    /// Plans a full rota, stamped now, under the default name.
    pub fn plan(&self, drivers: &[Driver], areas: &[DeliveryArea]) -> PlanOutcome {
        self.run(drivers, areas, Schedule::new(), self.balance_start)
    }

    /// Plans from a request.
    pub fn plan_request(&self, request: &PlanRequest) -> PlanOutcome {
        let schedule = request
            .planned_at
            .map(Schedule::at)
            .unwrap_or_default()
            .with_name(request.schedule_name.clone());
        let balance_start = request.balance_start.unwrap_or(self.balance_start);
        self.run(&request.drivers, &request.areas, schedule, balance_start)
    }

    fn run(
        &self,
        drivers: &[Driver],
        areas: &[DeliveryArea],
        schedule: Schedule,
        balance_start: Week,
    ) -> PlanOutcome {
        let drivers = sort_drivers(drivers);
        let ordered_areas = sort_areas(areas);
        let graph = RouteGraph::new(areas);
        let mut state = PlanState::new(schedule);

        self.place_weekly(&drivers, &ordered_areas, &graph, &mut state);

        let routes = self.routable_groups(&graph, &mut state);
        for week in Week::BOTH {
            self.place_routes(&drivers, &routes, week, &mut state);
        }

        self.place_remaining(&drivers, &ordered_areas, &graph, balance_start, &mut state);

        info!(
            drivers = drivers.len(),
            areas = graph.len(),
            assignments = state.schedule.assignment_count(),
            issues = state.issues.len(),
            "Auto-plan finished"
        );

        PlanOutcome {
            schedule: state.schedule,
            issues: state.issues,
        }
    }

    /// Pass 1: standalone weekly areas, same span in both weeks.
    fn place_weekly(
        &self,
        drivers: &[&Driver],
        areas: &[&DeliveryArea],
        graph: &RouteGraph<'_>,
        state: &mut PlanState,
    ) {
        debug!("Pass 1: weekly standalone areas");
        for &area in areas {
            if !area.is_weekly() || area.week_assignment.is_some() || graph.is_linked(&area.id) {
                continue;
            }
            if state.is_assigned(&area.id) {
                continue;
            }

            let found = first_fit(drivers, |driver, day| {
                let span = check_placement(driver, area, Week::One, day, &state.occupancy).ok()?;
                can_place(driver, area, Week::Two, day, &state.occupancy).then_some(span)
            });

            match found {
                Some((driver, span)) => {
                    state.commit(driver, area, Week::One, span);
                    state.commit(driver, area, Week::Two, span);
                }
                None => state.report(PlanIssue::no_feasible_placement(
                    area.id.clone(),
                    Week::BOTH.to_vec(),
                )),
            }
        }
    }

    /// Resolves the routes passes 2 and 3 may place, with their week.
    ///
    /// Cyclic routes and routes without one shared week are reported and
    /// dropped. Survivors are ordered weekly first, then longest first.
    fn routable_groups<'a>(
        &self,
        graph: &RouteGraph<'a>,
        state: &mut PlanState,
    ) -> Vec<(RouteGroup<'a>, Week)> {
        let mut routes = Vec::new();
        for group in graph.groups() {
            if group.is_cyclic() {
                warn!(route = %group.key(), "Cyclic consecutive links; route skipped");
                state.report(PlanIssue::cyclic_route(group.ids()));
                continue;
            }
            match group.common_week() {
                Some(week) => routes.push((group, week)),
                None if group.members().iter().all(|m| m.week_assignment.is_none()) => {
                    warn!(route = %group.key(), "Route has no pinned week; route skipped");
                    state.report(PlanIssue::unpinned_route(group.ids()));
                }
                None => {
                    warn!(route = %group.key(), "Route members disagree on week; route skipped");
                    state.report(PlanIssue::mixed_route_week(group.ids()));
                }
            }
        }
        routes.sort_by_key(|(group, _)| (group.priority(), Reverse(group.total_days())));
        routes
    }

    /// Passes 2 and 3: consecutive routes pinned to `week`.
    fn place_routes(
        &self,
        drivers: &[&Driver],
        routes: &[(RouteGroup<'_>, Week)],
        week: Week,
        state: &mut PlanState,
    ) {
        debug!(week = week.number(), "Pass: consecutive routes");
        for (group, _) in routes.iter().filter(|(_, w)| *w == week) {
            let total = group.total_days();

            let found = first_fit(drivers, |driver, day| {
                let days = u8::try_from(total).ok()?;
                let span = DaySpan::new(day, days)?;
                let required: Vec<Weekday> = span.weekdays().collect();
                (can_place_route(driver, total, &required)
                    && state.occupancy.is_free(&driver.id, week, span))
                .then_some(span)
            });

            let placements = found.and_then(|(driver, span)| {
                member_spans(group, span.start()).map(|spans| (driver, spans))
            });

            match placements {
                Some((driver, spans)) => {
                    for (member, span) in group.members().iter().zip(spans) {
                        state.commit(driver, member, week, span);
                    }
                }
                None => state.report(PlanIssue::route_unplaced(group.ids(), week)),
            }
        }
    }

    /// Pass 4: remaining standalone areas, one week each.
    fn place_remaining(
        &self,
        drivers: &[&Driver],
        areas: &[&DeliveryArea],
        graph: &RouteGraph<'_>,
        balance_start: Week,
        state: &mut PlanState,
    ) {
        debug!("Pass 4: remaining standalone areas");
        let mut next_week = balance_start;
        for &area in areas {
            if graph.is_linked(&area.id) || state.is_assigned(&area.id) {
                continue;
            }
            // Unpinned weekly areas belong to pass 1
            if area.is_weekly() && area.week_assignment.is_none() {
                continue;
            }

            let week = area.week_assignment.unwrap_or_else(|| {
                let week = next_week;
                next_week = next_week.other();
                week
            });

            let found = first_fit(drivers, |driver, day| {
                check_placement(driver, area, week, day, &state.occupancy).ok()
            });

            match found {
                Some((driver, span)) => state.commit(driver, area, week, span),
                None => state.report(PlanIssue::no_feasible_placement(area.id.clone(), vec![week])),
            }
        }
    }
}

impl Default for AutoPlanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Back-to-back spans for each route member, starting at `start`.
fn member_spans(group: &RouteGroup<'_>, start: Weekday) -> Option<Vec<DaySpan>> {
    let mut spans: Vec<DaySpan> = Vec::with_capacity(group.len());
    for member in group.members() {
        let span = match spans.last() {
            Some(previous) => previous.followed_by(member.delivery_days)?,
            None => DaySpan::new(start, member.delivery_days)?,
        };
        spans.push(span);
    }
    Some(spans)
}

/// P1 before P2, then higher capability first. Stable.
fn sort_drivers(drivers: &[Driver]) -> Vec<&Driver> {
    let mut sorted: Vec<&Driver> = drivers.iter().collect();
    sorted.sort_by_key(|d| (d.priority, Reverse(d.delivery_day_capability)));
    sorted
}

/// Weekly before fortnightly, then longer spans first. Stable.
fn sort_areas(areas: &[DeliveryArea]) -> Vec<&DeliveryArea> {
    let mut sorted: Vec<&DeliveryArea> = areas.iter().collect();
    sorted.sort_by_key(|a| (a.priority, Reverse(a.delivery_days)));
    sorted
}
