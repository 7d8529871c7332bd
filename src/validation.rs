//! Input validation for rota entities.
//!
//! Checks structural integrity of drivers and delivery areas at the
//! entity store boundary, before they reach the planner or the grid.
//! Detects:
//! - Duplicate IDs
//! - Missing names, postcodes or working days
//! - Out-of-range capabilities, delivery spans and route orders
//! - Dangling or self-referencing consecutive links
//!
//! Malformed entities are rejected here; the planner assumes valid input.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{DeliveryArea, Driver, MAX_DELIVERY_DAYS};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A required name is blank.
    EmptyName,
    /// A driver works no days.
    NoAvailableDays,
    /// A delivery area has no postcodes.
    EmptyPostcodes,
    /// A driver capability or area span is outside 1..=3.
    SpanOutOfRange,
    /// A route order is outside 1..=3.
    InvalidRouteOrder,
    /// `consecutive_with` points to an area that doesn't exist.
    UnknownConsecutiveArea,
    /// `consecutive_with` points to the area itself.
    SelfConsecutive,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the entity snapshots handed to the rota core.
///
/// Checks:
/// 1. No duplicate driver IDs, no duplicate area IDs
/// 2. Drivers have a name, at least one working day, capability in 1..=3
/// 3. Areas have a name, at least one postcode, delivery days in 1..=3
/// 4. Route orders are in 1..=3
/// 5. Consecutive links point to another existing area
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(drivers: &[Driver], areas: &[DeliveryArea]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut driver_ids = HashSet::new();
    for d in drivers {
        if !driver_ids.insert(d.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate driver ID: {}", d.id),
            ));
        }
        if d.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                format!("Driver '{}' has no name", d.id),
            ));
        }
        if d.available_days.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoAvailableDays,
                format!("Driver '{}' has no available days", d.id),
            ));
        }
        if !(1..=MAX_DELIVERY_DAYS).contains(&d.delivery_day_capability) {
            errors.push(ValidationError::new(
                ValidationErrorKind::SpanOutOfRange,
                format!(
                    "Driver '{}' has delivery day capability {} (expected 1-{})",
                    d.id, d.delivery_day_capability, MAX_DELIVERY_DAYS
                ),
            ));
        }
    }

    let mut area_ids = HashSet::new();
    for a in areas {
        if !area_ids.insert(a.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate delivery area ID: {}", a.id),
            ));
        }
        if a.name.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyName,
                format!("Delivery area '{}' has no name", a.id),
            ));
        }
        if a.postcodes.iter().all(|pc| pc.trim().is_empty()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyPostcodes,
                format!("Delivery area '{}' has no postcodes", a.id),
            ));
        }
        if !(1..=MAX_DELIVERY_DAYS).contains(&a.delivery_days) {
            errors.push(ValidationError::new(
                ValidationErrorKind::SpanOutOfRange,
                format!(
                    "Delivery area '{}' needs {} delivery days (expected 1-{})",
                    a.id, a.delivery_days, MAX_DELIVERY_DAYS
                ),
            ));
        }
        if let Some(order) = a.route_order {
            if !(1..=MAX_DELIVERY_DAYS).contains(&order) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidRouteOrder,
                    format!("Delivery area '{}' has route order {}", a.id, order),
                ));
            }
        }
    }

    // Links are checked once every area ID is known
    for a in areas {
        if let Some(target) = &a.consecutive_with {
            if target == &a.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfConsecutive,
                    format!("Delivery area '{}' is consecutive with itself", a.id),
                ));
            } else if !area_ids.contains(target.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownConsecutiveArea,
                    format!(
                        "Delivery area '{}' is consecutive with unknown area '{}'",
                        a.id, target
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Weekday;

    fn sample_drivers() -> Vec<Driver> {
        vec![
            Driver::new("D1").with_name("Ada Byrne").with_capability(3),
            Driver::new("D2").with_name("Sam Okafor"),
        ]
    }

    fn sample_areas() -> Vec<DeliveryArea> {
        vec![
            DeliveryArea::new("A1")
                .with_name("Coast")
                .with_postcodes(["NE30"])
                .with_delivery_days(2)
                .with_route_order(1),
            DeliveryArea::new("A2")
                .with_name("Valley")
                .with_postcodes(["NE40"])
                .consecutive_with("A1")
                .with_route_order(2),
        ]
    }

    fn has_kind(errors: &[ValidationError], kind: ValidationErrorKind) -> bool {
        errors.iter().any(|e| e.kind == kind)
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_input(&sample_drivers(), &sample_areas()).is_ok());
    }

    #[test]
    fn test_duplicate_driver_id() {
        let drivers = vec![
            Driver::new("D1").with_name("A"),
            Driver::new("D1").with_name("B"),
        ];
        let errors = validate_input(&drivers, &sample_areas()).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("driver")));
    }

    #[test]
    fn test_duplicate_area_id() {
        let mut areas = sample_areas();
        areas.push(areas[0].clone());
        let errors = validate_input(&sample_drivers(), &areas).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_driver_without_days() {
        let drivers = vec![Driver::new("D1")
            .with_name("Idle")
            .with_available_days(Vec::<Weekday>::new())];
        let errors = validate_input(&drivers, &[]).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::NoAvailableDays));
    }

    #[test]
    fn test_out_of_range_spans() {
        let mut driver = Driver::new("D1").with_name("X");
        driver.delivery_day_capability = 4;
        let mut area = DeliveryArea::new("A1").with_name("Y").with_postcodes(["N1"]);
        area.delivery_days = 0;
        let errors = validate_input(&[driver], &[area]).unwrap_err();
        assert_eq!(
            errors
                .iter()
                .filter(|e| e.kind == ValidationErrorKind::SpanOutOfRange)
                .count(),
            2
        );
    }

    #[test]
    fn test_empty_postcodes_and_name() {
        let areas = vec![DeliveryArea::new("A1")];
        let errors = validate_input(&[], &areas).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::EmptyPostcodes));
        assert!(has_kind(&errors, ValidationErrorKind::EmptyName));
    }

    #[test]
    fn test_invalid_route_order() {
        let areas = vec![DeliveryArea::new("A1")
            .with_name("Z")
            .with_postcodes(["N1"])
            .with_route_order(4)];
        let errors = validate_input(&[], &areas).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::InvalidRouteOrder));
    }

    #[test]
    fn test_dangling_and_self_links() {
        let areas = vec![
            DeliveryArea::new("A1")
                .with_name("One")
                .with_postcodes(["N1"])
                .consecutive_with("A1"),
            DeliveryArea::new("A2")
                .with_name("Two")
                .with_postcodes(["N2"])
                .consecutive_with("NOPE"),
        ];
        let errors = validate_input(&[], &areas).unwrap_err();
        assert!(has_kind(&errors, ValidationErrorKind::SelfConsecutive));
        assert!(has_kind(&errors, ValidationErrorKind::UnknownConsecutiveArea));
    }

    #[test]
    fn test_multiple_errors() {
        let drivers = vec![Driver::new("D1")];
        let areas = vec![DeliveryArea::new("A1")];
        let errors = validate_input(&drivers, &areas).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
