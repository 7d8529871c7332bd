//! Error types for rota placement and schedule loading.

use thiserror::Error;

use crate::models::{Week, Weekday};

/// A manual placement was rejected. The schedule is unchanged.
///
/// Each variant names the check that failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlacementError {
    /// No driver with this ID is known to the grid.
    #[error("unknown driver '{0}'")]
    UnknownDriver(String),

    /// No delivery area with this ID is known to the grid.
    #[error("unknown delivery area '{0}'")]
    UnknownArea(String),

    /// The span would run past Friday.
    #[error("a {days}-day delivery cannot start on {start}: not enough days left in the week")]
    SpanExceedsWeek { start: Weekday, days: u8 },

    /// The driver does not work on one of the span's days.
    #[error("driver '{driver_id}' is not available on {day}")]
    DriverUnavailable { driver_id: String, day: Weekday },

    /// The driver already has an assignment on one of the span's days.
    #[error("driver '{driver_id}' is already delivering '{existing_area_id}' on {day} of {week}")]
    Overlap {
        driver_id: String,
        week: Week,
        day: Weekday,
        existing_area_id: String,
    },

    /// The span is longer than the driver's capability.
    #[error("driver '{driver_id}' can only handle {capability}-day deliveries, {required} required")]
    CapabilityExceeded {
        driver_id: String,
        capability: u8,
        required: u8,
    },

    /// Multi-day spans need an authorized driver.
    #[error("driver '{driver_id}' is not authorized for {days}-day deliveries")]
    NotMultiDayAuthorized { driver_id: String, days: u8 },

    /// A fortnightly area is already delivered in the other week.
    #[error("fortnightly area '{area_id}' is already scheduled in {scheduled_week}")]
    FortnightlyConflict { area_id: String, scheduled_week: Week },
}

impl PlacementError {
    /// Returns true if the rejection came from the driver's occupancy.
    pub fn is_overlap(&self) -> bool {
        matches!(self, PlacementError::Overlap { .. })
    }

    /// Returns true if the rejection references an unknown entity.
    pub fn is_unknown_reference(&self) -> bool {
        matches!(
            self,
            PlacementError::UnknownDriver(_) | PlacementError::UnknownArea(_)
        )
    }
}

/// A persisted schedule document breaks a schedule invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// An assignment references a driver that no longer exists.
    #[error("assignment references unknown driver '{0}'")]
    UnknownDriver(String),

    /// An assignment references an area that no longer exists.
    #[error("assignment references unknown delivery area '{0}'")]
    UnknownArea(String),

    /// `delivery_days` disagrees with the start/end days or the area.
    #[error("assignment of '{area_id}' in {week} has an invalid span: {reason}")]
    InvalidSpan {
        area_id: String,
        week: Week,
        reason: String,
    },

    /// Two assignments for one driver overlap.
    #[error("driver '{driver_id}' is double-booked on {day} of {week} ('{first_area_id}' and '{second_area_id}')")]
    Overlap {
        driver_id: String,
        week: Week,
        day: Weekday,
        first_area_id: String,
        second_area_id: String,
    },

    /// An area is assigned more than once in the same week.
    #[error("delivery area '{area_id}' is assigned more than once in {week}")]
    DuplicateAssignment { area_id: String, week: Week },

    /// A fortnightly area is assigned in both weeks.
    #[error("fortnightly area '{area_id}' is assigned in both weeks")]
    FortnightlyInBothWeeks { area_id: String },

    /// An assignment breaks a placement rule for its driver.
    #[error("assignment of '{area_id}' in {week} breaks a placement rule: {source}")]
    RuleViolation {
        area_id: String,
        week: Week,
        source: PlacementError,
    },
}

impl ScheduleError {
    /// Returns true if the document double-books a driver or an area.
    pub fn is_double_booking(&self) -> bool {
        matches!(
            self,
            ScheduleError::Overlap { .. } | ScheduleError::DuplicateAssignment { .. }
        )
    }
}

/// A week number other than 1 or 2.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid week {0}: expected 1 or 2")]
pub struct WeekParseError(pub u8);

/// An area priority other than 1 or 2.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("invalid area priority {0}: expected 1 or 2")]
pub struct PriorityParseError(pub u8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_error_messages() {
        let e = PlacementError::NotMultiDayAuthorized {
            driver_id: "D1".into(),
            days: 3,
        };
        assert_eq!(
            e.to_string(),
            "driver 'D1' is not authorized for 3-day deliveries"
        );

        let e = PlacementError::SpanExceedsWeek {
            start: Weekday::Thursday,
            days: 3,
        };
        assert!(e.to_string().contains("Thursday"));
    }

    #[test]
    fn test_placement_error_predicates() {
        let overlap = PlacementError::Overlap {
            driver_id: "D1".into(),
            week: Week::One,
            day: Weekday::Monday,
            existing_area_id: "A1".into(),
        };
        assert!(overlap.is_overlap());
        assert!(!overlap.is_unknown_reference());
        assert!(PlacementError::UnknownArea("X".into()).is_unknown_reference());
    }

    #[test]
    fn test_schedule_error_chains_placement_error() {
        use std::error::Error as _;

        let e = ScheduleError::RuleViolation {
            area_id: "A1".into(),
            week: Week::Two,
            source: PlacementError::NotMultiDayAuthorized {
                driver_id: "D1".into(),
                days: 2,
            },
        };
        assert!(e.to_string().starts_with("assignment of 'A1' in week 2"));
        assert!(e.source().is_some());
        assert!(!e.is_double_booking());
        assert!(ScheduleError::DuplicateAssignment {
            area_id: "A1".into(),
            week: Week::One
        }
        .is_double_booking());
    }

    #[test]
    fn test_week_parse_error() {
        assert_eq!(WeekParseError(3).to_string(), "invalid week 3: expected 1 or 2");
    }
}
