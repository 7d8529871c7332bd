//! Rota calendar: weekdays, rotation weeks and day spans.
//!
//! # Time Model
//! The rota is a fixed two-week rotation of five working days. A position
//! in the rota is `(Week, Weekday)`; there are no dates or hours.
//!
//! A `DaySpan` is an inclusive range of consecutive weekdays inside one
//! week. Spans never wrap into the following week: a span is constructible
//! iff `start_index + days - 1 <= 4`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WeekParseError;

/// Working days per week.
pub const DAYS_PER_WEEK: usize = 5;

/// Longest span a single placement may cover (days).
pub const MAX_DELIVERY_DAYS: u8 = 3;

/// A working day, Monday through Friday.
///
/// Serialized as the full English name (`"Monday"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    /// All working days in calendar order.
    pub const ALL: [Weekday; DAYS_PER_WEEK] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// 0-based position within the week (Monday = 0).
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Weekday at a 0-based position, `None` past Friday.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Full English name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A week of the two-week rotation.
///
/// Serialized as the integer `1` or `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Week {
    One,
    Two,
}

impl Week {
    /// Both weeks in rotation order.
    pub const BOTH: [Week; 2] = [Week::One, Week::Two];

    /// 1-based week number.
    #[inline]
    pub fn number(self) -> u8 {
        match self {
            Week::One => 1,
            Week::Two => 2,
        }
    }

    /// The other week of the rotation.
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Week::One => Week::Two,
            Week::Two => Week::One,
        }
    }
}

impl TryFrom<u8> for Week {
    type Error = WeekParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Week::One),
            2 => Ok(Week::Two),
            other => Err(WeekParseError(other)),
        }
    }
}

impl From<Week> for u8 {
    fn from(week: Week) -> Self {
        week.number()
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "week {}", self.number())
    }
}

/// An inclusive range of consecutive weekdays within one week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DaySpan {
    start: Weekday,
    days: u8,
}

impl DaySpan {
    /// Creates a span of `days` days starting at `start`.
    ///
    /// Returns `None` if `days` is zero or the span runs past Friday.
    pub fn new(start: Weekday, days: u8) -> Option<Self> {
        if days == 0 || start.index() + days as usize > DAYS_PER_WEEK {
            return None;
        }
        Some(Self { start, days })
    }

    /// Creates a span from a 0-based start index.
    pub fn from_index(start_index: usize, days: u8) -> Option<Self> {
        Weekday::from_index(start_index).and_then(|start| Self::new(start, days))
    }

    /// First day of the span.
    #[inline]
    pub fn start(&self) -> Weekday {
        self.start
    }

    /// Last day of the span (inclusive).
    #[inline]
    pub fn end(&self) -> Weekday {
        Weekday::ALL[self.start.index() + self.days as usize - 1]
    }

    /// Number of days covered.
    #[inline]
    pub fn days(&self) -> u8 {
        self.days
    }

    /// Whether `day` falls within the span.
    #[inline]
    pub fn contains(&self, day: Weekday) -> bool {
        day >= self.start && day <= self.end()
    }

    /// The days covered, in order.
    pub fn weekdays(&self) -> impl Iterator<Item = Weekday> {
        (self.start.index()..=self.end().index()).filter_map(Weekday::from_index)
    }

    /// The span of `days` days beginning the day after this one ends.
    pub fn followed_by(&self, days: u8) -> Option<Self> {
        Self::from_index(self.end().index() + 1, days)
    }
}

impl fmt::Display for DaySpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days == 1 {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_index_round_trip() {
        for (i, day) in Weekday::ALL.iter().enumerate() {
            assert_eq!(day.index(), i);
            assert_eq!(Weekday::from_index(i), Some(*day));
        }
        assert_eq!(Weekday::from_index(5), None);
    }

    #[test]
    fn test_week_other() {
        assert_eq!(Week::One.other(), Week::Two);
        assert_eq!(Week::Two.other(), Week::One);
        assert_eq!(Week::try_from(2), Ok(Week::Two));
        assert!(Week::try_from(3).is_err());
    }

    #[test]
    fn test_span_fits_in_week() {
        assert!(DaySpan::new(Weekday::Wednesday, 3).is_some());
        assert!(DaySpan::new(Weekday::Thursday, 3).is_none());
        assert!(DaySpan::new(Weekday::Friday, 1).is_some());
        assert!(DaySpan::new(Weekday::Monday, 0).is_none());
        assert!(DaySpan::from_index(5, 1).is_none());
    }

    #[test]
    fn test_span_bounds() {
        let span = DaySpan::new(Weekday::Tuesday, 3).unwrap();
        assert_eq!(span.start(), Weekday::Tuesday);
        assert_eq!(span.end(), Weekday::Thursday);
        assert!(span.contains(Weekday::Wednesday));
        assert!(!span.contains(Weekday::Monday));
        assert!(!span.contains(Weekday::Friday));
        let days: Vec<_> = span.weekdays().collect();
        assert_eq!(
            days,
            vec![Weekday::Tuesday, Weekday::Wednesday, Weekday::Thursday]
        );
    }

    #[test]
    fn test_span_followed_by() {
        let a = DaySpan::new(Weekday::Monday, 2).unwrap();
        let b = a.followed_by(1).unwrap();
        assert_eq!(b.start(), Weekday::Wednesday);
        assert!(DaySpan::new(Weekday::Thursday, 2)
            .unwrap()
            .followed_by(1)
            .is_none());
    }

    #[test]
    fn test_span_display() {
        assert_eq!(DaySpan::new(Weekday::Monday, 1).unwrap().to_string(), "Monday");
        assert_eq!(
            DaySpan::new(Weekday::Monday, 3).unwrap().to_string(),
            "Monday-Wednesday"
        );
    }
}
