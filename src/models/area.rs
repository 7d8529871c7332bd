//! Delivery area model.
//!
//! A delivery area is a set of postcodes delivered as one unit over
//! `delivery_days` consecutive days. Areas may be chained into
//! consecutive routes through `consecutive_with` / `route_order`.
//!
//! # Week semantics
//! `week_assignment = None` is overloaded:
//! - weekly (priority 1) areas run in **both** weeks;
//! - fortnightly (priority 2) areas run in **one** week chosen by the planner.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use super::{Week, MAX_DELIVERY_DAYS};
use crate::error::PriorityParseError;

/// A geographic delivery area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryArea {
    /// Unique area identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Postcodes covered (upper-case, de-duplicated).
    #[serde(deserialize_with = "deserialize_postcodes")]
    pub postcodes: Vec<String>,
    /// Consecutive days one delivery of this area takes (1-3).
    #[serde(default = "default_delivery_days")]
    pub delivery_days: u8,
    /// Delivery frequency.
    #[serde(default)]
    pub priority: AreaPriority,
    /// Week restriction. See the module docs for `None`.
    #[serde(default)]
    pub week_assignment: Option<Week>,
    /// Area that must be delivered back-to-back with this one.
    #[serde(default)]
    pub consecutive_with: Option<String>,
    /// Position within a consecutive route (1-3).
    #[serde(default)]
    pub route_order: Option<u8>,
}

/// Area priority.
///
/// Serialized as `1` (weekly) or `2` (fortnightly).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AreaPriority {
    /// Priority 1: delivered every week, same days in both weeks.
    #[default]
    Weekly,
    /// Priority 2: delivered once per rotation.
    Fortnightly,
}

impl TryFrom<u8> for AreaPriority {
    type Error = PriorityParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AreaPriority::Weekly),
            2 => Ok(AreaPriority::Fortnightly),
            other => Err(PriorityParseError(other)),
        }
    }
}

impl From<AreaPriority> for u8 {
    fn from(priority: AreaPriority) -> Self {
        match priority {
            AreaPriority::Weekly => 1,
            AreaPriority::Fortnightly => 2,
        }
    }
}

fn default_delivery_days() -> u8 {
    1
}

fn deserialize_postcodes<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(normalize_postcodes(raw))
}

impl DeliveryArea {
    /// Creates a weekly, 1-day area with no postcodes.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            postcodes: Vec::new(),
            delivery_days: default_delivery_days(),
            priority: AreaPriority::Weekly,
            week_assignment: None,
            consecutive_with: None,
            route_order: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the postcodes, upper-casing and removing duplicates.
    pub fn with_postcodes<I, S>(mut self, postcodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.postcodes = normalize_postcodes(postcodes);
        self
    }

    /// Sets the delivery span, clamped to 1..=3.
    pub fn with_delivery_days(mut self, days: u8) -> Self {
        self.delivery_days = days.clamp(1, MAX_DELIVERY_DAYS);
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: AreaPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Pins the area to one week.
    pub fn with_week(mut self, week: Week) -> Self {
        self.week_assignment = Some(week);
        self
    }

    /// Links this area to another for back-to-back delivery.
    pub fn consecutive_with(mut self, area_id: impl Into<String>) -> Self {
        self.consecutive_with = Some(area_id.into());
        self
    }

    /// Sets the position within a consecutive route.
    pub fn with_route_order(mut self, order: u8) -> Self {
        self.route_order = Some(order);
        self
    }

    /// Whether the area runs every week.
    #[inline]
    pub fn is_weekly(&self) -> bool {
        self.priority == AreaPriority::Weekly
    }

    /// Weeks this area should occupy when fully scheduled.
    ///
    /// Weekly areas without a pinned week need both weeks; everything
    /// else needs exactly one.
    pub fn required_weeks(&self) -> usize {
        if self.is_weekly() && self.week_assignment.is_none() {
            2
        } else {
            1
        }
    }
}

/// Upper-cases and trims postcodes, dropping blanks and duplicates.
///
/// First-occurrence order is kept.
pub fn normalize_postcodes<I, S>(postcodes: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    postcodes
        .into_iter()
        .map(|pc| pc.as_ref().trim().to_uppercase())
        .filter(|pc| !pc.is_empty() && seen.insert(pc.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_builder() {
        let a = DeliveryArea::new("A1")
            .with_name("North Loop")
            .with_postcodes(["ne1", "NE2"])
            .with_delivery_days(2)
            .with_priority(AreaPriority::Fortnightly)
            .with_week(Week::Two)
            .consecutive_with("A2")
            .with_route_order(1);

        assert_eq!(a.name, "North Loop");
        assert_eq!(a.postcodes, vec!["NE1", "NE2"]);
        assert_eq!(a.delivery_days, 2);
        assert!(!a.is_weekly());
        assert_eq!(a.week_assignment, Some(Week::Two));
        assert_eq!(a.consecutive_with.as_deref(), Some("A2"));
        assert_eq!(a.route_order, Some(1));
    }

    #[test]
    fn test_postcode_normalization() {
        let pcs = normalize_postcodes(["ne1 ", "NE1", "", "sr5", "Ne1"]);
        assert_eq!(pcs, vec!["NE1", "SR5"]);
    }

    #[test]
    fn test_deserialized_postcodes_normalized() {
        let json = r#"{
            "id": "A1",
            "name": "Harbour",
            "postcodes": ["ne1 ", "NE1", "sr5"],
            "deliveryDays": 2,
            "priority": 2,
            "weekAssignment": 1
        }"#;
        let area: DeliveryArea = serde_json::from_str(json).unwrap();
        assert_eq!(area.postcodes, vec!["NE1", "SR5"]);
        assert_eq!(area.priority, AreaPriority::Fortnightly);
        assert_eq!(area.week_assignment, Some(Week::One));
    }

    #[test]
    fn test_delivery_days_clamping() {
        assert_eq!(DeliveryArea::new("A").with_delivery_days(9).delivery_days, 3);
        assert_eq!(DeliveryArea::new("A").with_delivery_days(0).delivery_days, 1);
    }

    #[test]
    fn test_required_weeks() {
        assert_eq!(DeliveryArea::new("A").required_weeks(), 2);
        assert_eq!(DeliveryArea::new("A").with_week(Week::One).required_weeks(), 1);
        let fortnightly = DeliveryArea::new("B").with_priority(AreaPriority::Fortnightly);
        assert_eq!(fortnightly.required_weeks(), 1);
    }

    #[test]
    fn test_priority_from_number() {
        assert_eq!(AreaPriority::try_from(1), Ok(AreaPriority::Weekly));
        assert_eq!(AreaPriority::try_from(2), Ok(AreaPriority::Fortnightly));
        assert!(AreaPriority::try_from(0).is_err());
        assert_eq!(u8::from(AreaPriority::Fortnightly), 2);
    }
}
