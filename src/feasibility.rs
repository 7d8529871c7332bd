//! Availability and capability rules.
//!
//! Pure predicates answering "can this driver take this span, in this
//! week, with this capability profile?". Shared by the auto-planner and
//! manual grid edits so both enforce the same rules.
//!
//! # Rules
//! For a driver, an area, a week and a start day:
//! 1. The span fits in the week (`start + days - 1 <= Friday`).
//! 2. The driver works every day of the span.
//! 3. The driver has no other assignment on those days in that week.
//! 4. The driver's capability covers the span length.
//! 5. Spans of two or more days need a multi-day authorized driver.

use crate::error::PlacementError;
use crate::grid::Occupancy;
use crate::models::{DaySpan, DeliveryArea, Driver, Week, Weekday};

/// Checks every placement rule, reporting the first that fails.
///
/// Returns the span the placement would cover.
pub fn check_placement(
    driver: &Driver,
    area: &DeliveryArea,
    week: Week,
    start: Weekday,
    occupancy: &Occupancy,
) -> Result<DaySpan, PlacementError> {
    check_placement_replacing(driver, area, week, start, occupancy, None)
}

/// Like [`check_placement`], ignoring slots held by `replaced_area`.
///
/// Used when an area's existing assignment in `week` is about to be
/// replaced by the new one.
pub(crate) fn check_placement_replacing(
    driver: &Driver,
    area: &DeliveryArea,
    week: Week,
    start: Weekday,
    occupancy: &Occupancy,
    replaced_area: Option<&str>,
) -> Result<DaySpan, PlacementError> {
    let days = area.delivery_days;
    let span = DaySpan::new(start, days).ok_or(PlacementError::SpanExceedsWeek { start, days })?;

    if let Some(day) = span.weekdays().find(|d| !driver.is_available_on(*d)) {
        return Err(PlacementError::DriverUnavailable {
            driver_id: driver.id.clone(),
            day,
        });
    }

    if let Some((day, existing)) = occupancy.first_conflict(&driver.id, week, span, replaced_area)
    {
        return Err(PlacementError::Overlap {
            driver_id: driver.id.clone(),
            week,
            day,
            existing_area_id: existing.to_string(),
        });
    }

    if driver.delivery_day_capability < days {
        return Err(PlacementError::CapabilityExceeded {
            driver_id: driver.id.clone(),
            capability: driver.delivery_day_capability,
            required: days,
        });
    }

    if days >= 2 && !driver.multi_day_authorized {
        return Err(PlacementError::NotMultiDayAuthorized {
            driver_id: driver.id.clone(),
            days,
        });
    }

    Ok(span)
}

/// Whether `driver` can deliver `area` in `week` starting on `start`.
///
/// No side effects.
///
/// # Example
/// ```
/// use delivery_rota::feasibility::can_place;
/// use delivery_rota::grid::Occupancy;
/// use delivery_rota::models::{DeliveryArea, Driver, Week, Weekday};
///
/// let driver = Driver::new("D1").with_capability(3);
/// let area = DeliveryArea::new("A1").with_delivery_days(2);
/// let occupancy = Occupancy::new();
///
/// // Capable, but not authorized for multi-day work
/// assert!(!can_place(&driver, &area, Week::One, Weekday::Monday, &occupancy));
///
/// let driver = driver.with_multi_day_authorization(true);
/// assert!(can_place(&driver, &area, Week::One, Weekday::Monday, &occupancy));
/// assert!(!can_place(&driver, &area, Week::One, Weekday::Friday, &occupancy));
/// ```
pub fn can_place(
    driver: &Driver,
    area: &DeliveryArea,
    week: Week,
    start: Weekday,
    occupancy: &Occupancy,
) -> bool {
    check_placement(driver, area, week, start, occupancy).is_ok()
}

/// Whether `driver` can run a whole consecutive route.
///
/// Applies rules 2, 4 and 5 to the route's total span and the full list
/// of weekdays it covers. Occupancy and week fit are checked by the
/// caller once a concrete start day is chosen.
pub fn can_place_route(driver: &Driver, total_days: u32, required_days: &[Weekday]) -> bool {
    required_days.iter().all(|d| driver.is_available_on(*d))
        && u8::try_from(total_days).is_ok_and(|days| driver.can_handle_span(days))
}
