//! Driver model.
//!
//! Drivers are the resources of the rota. Each driver has a set of
//! working days, a maximum consecutive-day span per placement, a
//! scheduling priority, and a multi-day authorization flag.
//!
//! Drivers are owned by the entity store; the planner only reads them.

use serde::{Deserialize, Serialize};

use super::{Weekday, MAX_DELIVERY_DAYS};

/// A delivery driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    /// Unique driver identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Days the driver works. Defaults to Monday through Friday.
    #[serde(default = "all_weekdays")]
    pub available_days: Vec<Weekday>,
    /// Longest span (days) the driver may run for one placement (1-3).
    #[serde(default = "default_capability")]
    pub delivery_day_capability: u8,
    /// Planning priority.
    #[serde(default)]
    pub priority: DriverPriority,
    /// Whether the driver may take placements spanning two or more days.
    #[serde(default)]
    pub multi_day_authorized: bool,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

/// Driver priority. P1 drivers are considered before P2 drivers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DriverPriority {
    #[default]
    P1,
    P2,
}

fn all_weekdays() -> Vec<Weekday> {
    Weekday::ALL.to_vec()
}

fn default_capability() -> u8 {
    1
}

impl Driver {
    /// Creates a P1 driver available all week with a 1-day capability.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            available_days: all_weekdays(),
            delivery_day_capability: default_capability(),
            priority: DriverPriority::P1,
            multi_day_authorized: false,
            notes: String::new(),
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replaces the available days.
    pub fn with_available_days(mut self, days: impl IntoIterator<Item = Weekday>) -> Self {
        self.available_days = days.into_iter().collect();
        self
    }

    /// Sets the delivery day capability, clamped to 1..=3.
    pub fn with_capability(mut self, days: u8) -> Self {
        self.delivery_day_capability = days.clamp(1, MAX_DELIVERY_DAYS);
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: DriverPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Grants or revokes multi-day authorization.
    pub fn with_multi_day_authorization(mut self, authorized: bool) -> Self {
        self.multi_day_authorized = authorized;
        self
    }

    /// Sets the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Whether the driver works on `day`.
    #[inline]
    pub fn is_available_on(&self, day: Weekday) -> bool {
        self.available_days.contains(&day)
    }

    /// Whether the driver may take a placement of `days` days.
    ///
    /// Checks both the capability ceiling and, for spans of two or
    /// more days, the multi-day authorization.
    pub fn can_handle_span(&self, days: u8) -> bool {
        self.delivery_day_capability >= days && (days < 2 || self.multi_day_authorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_defaults() {
        let d = Driver::new("D1");
        assert_eq!(d.available_days.len(), 5);
        assert_eq!(d.delivery_day_capability, 1);
        assert_eq!(d.priority, DriverPriority::P1);
        assert!(!d.multi_day_authorized);
    }

    #[test]
    fn test_driver_builder() {
        let d = Driver::new("D1")
            .with_name("Rui Santos")
            .with_available_days([Weekday::Monday, Weekday::Tuesday])
            .with_capability(3)
            .with_priority(DriverPriority::P2)
            .with_multi_day_authorization(true)
            .with_notes("prefers the north loop");

        assert_eq!(d.name, "Rui Santos");
        assert!(d.is_available_on(Weekday::Tuesday));
        assert!(!d.is_available_on(Weekday::Friday));
        assert_eq!(d.delivery_day_capability, 3);
        assert_eq!(d.priority, DriverPriority::P2);
        assert_eq!(d.notes, "prefers the north loop");
    }

    #[test]
    fn test_capability_clamping() {
        assert_eq!(Driver::new("D1").with_capability(0).delivery_day_capability, 1);
        assert_eq!(Driver::new("D1").with_capability(7).delivery_day_capability, 3);
    }

    #[test]
    fn test_can_handle_span() {
        let unauthorized = Driver::new("D1").with_capability(3);
        assert!(unauthorized.can_handle_span(1));
        assert!(!unauthorized.can_handle_span(2));

        let authorized = Driver::new("D2")
            .with_capability(2)
            .with_multi_day_authorization(true);
        assert!(authorized.can_handle_span(2));
        assert!(!authorized.can_handle_span(3));
    }

    #[test]
    fn test_priority_ordering() {
        assert!(DriverPriority::P1 < DriverPriority::P2);
    }
}
