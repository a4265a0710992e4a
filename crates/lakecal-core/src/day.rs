//! Per-day display state for availability calendars.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::interval::{BusyInterval, is_booked};

/// Display state of a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Strictly before today; never bookable.
    Past,
    /// The current local date.
    Today,
    /// Inside at least one busy interval.
    Booked,
    /// Free to book.
    Available,
}

impl DayStatus {
    /// Returns the lowercase name used in JSON and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Today => "today",
            Self::Booked => "booked",
            Self::Available => "available",
        }
    }
}

impl std::fmt::Display for DayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a day against today's date and a set of busy intervals.
///
/// The first matching rule wins: past, then today, then booked. Today keeps
/// its own state even when it falls inside a busy interval.
pub fn classify_day(date: NaiveDate, today: NaiveDate, intervals: &[BusyInterval]) -> DayStatus {
    if date < today {
        DayStatus::Past
    } else if date == today {
        DayStatus::Today
    } else if is_booked(date, intervals) {
        DayStatus::Booked
    } else {
        DayStatus::Available
    }
}

/// Returns the current date in the local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march_stay() -> Vec<BusyInterval> {
        vec![BusyInterval::new(date(2024, 3, 1), date(2024, 3, 5)).unwrap()]
    }

    #[test]
    fn booked_days_follow_exclusive_end() {
        let today = date(2024, 2, 1);
        let intervals = march_stay();

        for day in 1..=4 {
            assert_eq!(
                classify_day(date(2024, 3, day), today, &intervals),
                DayStatus::Booked,
                "march {day}"
            );
        }
        assert_eq!(
            classify_day(date(2024, 3, 5), today, &intervals),
            DayStatus::Available
        );
    }

    #[test]
    fn today_wins_over_booked() {
        let intervals = march_stay();
        let today = date(2024, 3, 2);
        assert_eq!(classify_day(today, today, &intervals), DayStatus::Today);
        assert_eq!(
            classify_day(date(2024, 3, 3), today, &intervals),
            DayStatus::Booked
        );
    }

    #[test]
    fn past_wins_over_booked() {
        let intervals = march_stay();
        let today = date(2024, 3, 4);
        assert_eq!(
            classify_day(date(2024, 3, 1), today, &intervals),
            DayStatus::Past
        );
        assert_eq!(
            classify_day(date(2023, 12, 31), today, &[]),
            DayStatus::Past
        );
    }

    #[test]
    fn no_intervals_means_available() {
        let today = date(2026, 10, 17);
        assert_eq!(
            classify_day(date(2026, 10, 18), today, &[]),
            DayStatus::Available
        );
        assert_eq!(
            classify_day(date(2027, 1, 1), today, &[]),
            DayStatus::Available
        );
    }

    #[test]
    fn status_serde_names() {
        let json = serde_json::to_string(&DayStatus::Available).unwrap();
        assert_eq!(json, "\"available\"");
        assert_eq!(DayStatus::Today.to_string(), "today");
    }
}
