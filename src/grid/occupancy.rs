//! Driver occupancy table.
//!
//! Maps `driver × week × weekday` to the area occupying that slot.
//! Both the auto-planner and the schedule grid keep one of these next
//! to their assignment list and update it on every commit, so overlap
//! checks never rescan the assignments.
//!
//! # Invariant
//! A slot holds at most one area. `occupy` is only called after a
//! successful conflict check; `from_assignments` rejects overlaps.

use std::collections::HashMap;

use crate::error::ScheduleError;
use crate::models::{Assignment, DaySpan, Week, Weekday, DAYS_PER_WEEK};

type WeekSlots = [[Option<String>; DAYS_PER_WEEK]; 2];

/// Per-driver, per-week, per-weekday occupancy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Occupancy {
    slots: HashMap<String, WeekSlots>,
}

#[inline]
fn week_slot(week: Week) -> usize {
    usize::from(week.number() - 1)
}

impl Occupancy {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table from existing assignments.
    ///
    /// Fails on the first assignment with an inconsistent span or one
    /// that overlaps an earlier assignment of the same driver and week.
    pub fn from_assignments<'a, I>(assignments: I) -> Result<Self, ScheduleError>
    where
        I: IntoIterator<Item = &'a Assignment>,
    {
        let mut table = Self::new();
        for a in assignments {
            let span = a.span().ok_or_else(|| ScheduleError::InvalidSpan {
                area_id: a.delivery_area_id.clone(),
                week: a.week,
                reason: format!(
                    "{} to {} is not {} day(s)",
                    a.start_day, a.end_day, a.delivery_days
                ),
            })?;
            if let Some((day, existing)) = table.first_conflict(&a.driver_id, a.week, span, None) {
                return Err(ScheduleError::Overlap {
                    driver_id: a.driver_id.clone(),
                    week: a.week,
                    day,
                    first_area_id: existing.to_string(),
                    second_area_id: a.delivery_area_id.clone(),
                });
            }
            table.occupy(&a.driver_id, a.week, span, &a.delivery_area_id);
        }
        Ok(table)
    }

    /// The area occupying a driver's day, if any.
    pub fn occupant(&self, driver_id: &str, week: Week, day: Weekday) -> Option<&str> {
        self.slots
            .get(driver_id)
            .and_then(|weeks| weeks[week_slot(week)][day.index()].as_deref())
    }

    /// First day of `span` already taken by an area other than `ignore_area`.
    pub fn first_conflict(
        &self,
        driver_id: &str,
        week: Week,
        span: DaySpan,
        ignore_area: Option<&str>,
    ) -> Option<(Weekday, &str)> {
        span.weekdays().find_map(|day| {
            self.occupant(driver_id, week, day)
                .filter(|area| Some(*area) != ignore_area)
                .map(|area| (day, area))
        })
    }

    /// Whether every day of `span` is free for the driver.
    pub fn is_free(&self, driver_id: &str, week: Week, span: DaySpan) -> bool {
        self.first_conflict(driver_id, week, span, None).is_none()
    }

    /// Marks every day of `span` as taken by `area_id`.
    pub fn occupy(&mut self, driver_id: &str, week: Week, span: DaySpan, area_id: &str) {
        let weeks = self.slots.entry(driver_id.to_string()).or_default();
        for day in span.weekdays() {
            weeks[week_slot(week)][day.index()] = Some(area_id.to_string());
        }
    }

    /// Frees the days of `span` held by `area_id`.
    ///
    /// Slots held by other areas are left alone.
    pub fn release(&mut self, driver_id: &str, week: Week, span: DaySpan, area_id: &str) {
        if let Some(weeks) = self.slots.get_mut(driver_id) {
            for day in span.weekdays() {
                let slot = &mut weeks[week_slot(week)][day.index()];
                if slot.as_deref() == Some(area_id) {
                    *slot = None;
                }
            }
        }
    }

    /// Clears the table.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
