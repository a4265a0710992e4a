//! Busy date ranges extracted from calendar feeds.
//!
//! A [`BusyInterval`] is a half-open range of calendar dates `[start, end)`:
//! the end date is the first free day, as calendar feeds encode it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A contiguous range of days during which a listing is reserved.
///
/// Dates carry no time-of-day: they stand for local midnight of that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalBounds")]
pub struct BusyInterval {
    /// First reserved day (inclusive).
    pub start: NaiveDate,
    /// First free day after the reservation (exclusive).
    pub end: NaiveDate,
}

impl BusyInterval {
    /// Creates a new interval.
    ///
    /// Returns `None` when `end` is before `start`. Zero-length intervals are
    /// allowed; they never contain any day.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Checks if a day falls within this interval.
    ///
    /// Uses half-open semantics: `start <= date < end`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Number of reserved nights.
    pub fn nights(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

#[derive(Deserialize)]
struct IntervalBounds {
    start: NaiveDate,
    end: NaiveDate,
}

impl TryFrom<IntervalBounds> for BusyInterval {
    type Error = String;

    fn try_from(bounds: IntervalBounds) -> Result<Self, Self::Error> {
        Self::new(bounds.start, bounds.end).ok_or_else(|| {
            format!("interval ends on {} before it starts on {}", bounds.end, bounds.start)
        })
    }
}

/// Returns true if any interval in the set books `date`.
pub fn is_booked(date: NaiveDate, intervals: &[BusyInterval]) -> bool {
    intervals.iter().any(|interval| interval.contains(date))
}
