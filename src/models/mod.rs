//! Rota domain models.
//!
//! Provides the data types for the two-week delivery rota: the entities
//! supplied by the entity store (drivers, delivery areas), the calendar
//! primitives, and the persisted schedule document.
//!
//! # Domain Mappings
//!
//! | delivery-rota | Scheduling term |
//! |---------------|-----------------|
//! | Driver | Resource |
//! | DeliveryArea | Task with a fixed duration |
//! | Assignment | Resource × time interval |
//! | Schedule | Solution |

mod area;
mod driver;
mod schedule;
mod weekday;

pub use area::{normalize_postcodes, AreaPriority, DeliveryArea};
pub use driver::{Driver, DriverPriority};
pub use schedule::{Assignment, PlanIssue, PlanIssueType, Schedule, DEFAULT_SCHEDULE_NAME};
pub use weekday::{DaySpan, Week, Weekday, DAYS_PER_WEEK, MAX_DELIVERY_DAYS};
