//! Displayed months and their day-by-day availability grid.
//!
//! [`YearMonth`] is the month cursor a calendar view navigates with, and
//! [`MonthGrid`] classifies every day of one month for rendering. Weeks start
//! on Sunday.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::day::{DayStatus, classify_day};
use crate::interval::BusyInterval;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Error returned when a `YYYY-MM` month cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid month {input:?}: expected YYYY-MM")]
pub struct MonthParseError {
    input: String,
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first: NaiveDate,
}

impl YearMonth {
    /// Creates a month from a year and a 1-based month number.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// Returns the month that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// English month name.
    pub fn name(&self) -> &'static str {
        MONTH_NAMES[self.first.month0() as usize]
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Returns the date for a 1-based day number, if it exists in this month.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        self.first.with_day(day)
    }

    /// Number of days in the month.
    pub fn days_in_month(&self) -> u32 {
        match self.first.checked_add_months(Months::new(1)) {
            Some(next) => (next - self.first).num_days() as u32,
            None => 31,
        }
    }

    /// Number of blank cells before day 1 in a Sunday-first week.
    pub fn leading_blanks(&self) -> u32 {
        self.first.weekday().num_days_from_sunday()
    }

    /// The following month. Saturates at the end of the supported range.
    pub fn next(&self) -> Self {
        Self {
            first: self
                .first
                .checked_add_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// The preceding month. Saturates at the start of the supported range.
    pub fn previous(&self) -> Self {
        Self {
            first: self
                .first
                .checked_sub_months(Months::new(1))
                .unwrap_or(self.first),
        }
    }

    /// Returns true if `date` falls within this month.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = MonthParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || MonthParseError {
            input: s.to_string(),
        };
        let (year, month) = s.trim().split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u32 = month.parse().map_err(|_| err())?;
        Self::new(year, month).ok_or_else(err)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for YearMonth {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One day of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    /// Day of month, starting at 1.
    pub day: u32,
    pub date: NaiveDate,
    pub status: DayStatus,
}

/// Number of days per status in a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub past: u32,
    pub today: u32,
    pub booked: u32,
    pub available: u32,
}

impl StatusCounts {
    fn record(&mut self, status: DayStatus) {
        match status {
            DayStatus::Past => self.past += 1,
            DayStatus::Today => self.today += 1,
            DayStatus::Booked => self.booked += 1,
            DayStatus::Available => self.available += 1,
        }
    }
}

/// A fully classified month, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub today: NaiveDate,
    pub days: Vec<DayCell>,
}

impl MonthGrid {
    /// Classifies every day of `month` against `today` and `intervals`.
    pub fn build(month: YearMonth, today: NaiveDate, intervals: &[BusyInterval]) -> Self {
        let days = (1..=month.days_in_month())
            .filter_map(|day| {
                let date = month.day(day)?;
                Some(DayCell {
                    day,
                    date,
                    status: classify_day(date, today, intervals),
                })
            })
            .collect();

        Self { month, today, days }
    }

    /// Blank cells before day 1.
    pub fn leading_blanks(&self) -> u32 {
        self.month.leading_blanks()
    }

    /// Returns the status of a 1-based day number.
    pub fn status_of(&self, day: u32) -> Option<DayStatus> {
        self.days
            .get(day.checked_sub(1)? as usize)
            .map(|cell| cell.status)
    }

    /// Counts days per status.
    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for cell in &self.days {
            counts.record(cell.status);
        }
        counts
    }

    /// Lays the days out in Sunday-first weeks, padding with `None`.
    pub fn weeks(&self) -> Vec<[Option<DayCell>; 7]> {
        let mut weeks = Vec::new();
        let mut week = [None; 7];
        let mut column = self.leading_blanks() as usize;

        for cell in &self.days {
            week[column] = Some(*cell);
            column += 1;
            if column == 7 {
                weeks.push(week);
                week = [None; 7];
                column = 0;
            }
        }
        if column > 0 {
            weeks.push(week);
        }
        weeks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod year_month {
        use super::*;

        #[test]
        fn parse_and_display() {
            let month: YearMonth = "2024-03".parse().unwrap();
            assert_eq!(month.year(), 2024);
            assert_eq!(month.month(), 3);
            assert_eq!(month.name(), "March");
            assert_eq!(month.to_string(), "2024-03");
        }

        #[test]
        fn parse_rejects_garbage() {
            assert!("2024".parse::<YearMonth>().is_err());
            assert!("2024-13".parse::<YearMonth>().is_err());
            assert!("march".parse::<YearMonth>().is_err());
            let err = "2024-00".parse::<YearMonth>().unwrap_err();
            assert!(err.to_string().contains("YYYY-MM"));
        }

        #[test]
        fn days_in_month() {
            assert_eq!(YearMonth::new(2024, 2).unwrap().days_in_month(), 29);
            assert_eq!(YearMonth::new(2026, 2).unwrap().days_in_month(), 28);
            assert_eq!(YearMonth::new(2026, 4).unwrap().days_in_month(), 30);
            assert_eq!(YearMonth::new(2026, 12).unwrap().days_in_month(), 31);
        }

        #[test]
        fn navigation_crosses_years() {
            let december = YearMonth::new(2026, 12).unwrap();
            assert_eq!(december.next(), YearMonth::new(2027, 1).unwrap());
            assert_eq!(december.next().previous(), december);
            assert_eq!(
                YearMonth::new(2026, 1).unwrap().previous(),
                YearMonth::new(2025, 12).unwrap()
            );
        }

        #[test]
        fn containing_date() {
            let month = YearMonth::containing(date(2026, 10, 17));
            assert_eq!(month.first_day(), date(2026, 10, 1));
            assert!(month.contains(date(2026, 10, 31)));
            assert!(!month.contains(date(2026, 11, 1)));
        }

        #[test]
        fn leading_blanks_sunday_first() {
            // 2026-02-01 is a Sunday, 2024-03-01 a Friday.
            assert_eq!(YearMonth::new(2026, 2).unwrap().leading_blanks(), 0);
            assert_eq!(YearMonth::new(2024, 3).unwrap().leading_blanks(), 5);
        }

        #[test]
        fn serde_as_string() {
            let month = YearMonth::new(2024, 3).unwrap();
            let json = serde_json::to_string(&month).unwrap();
            assert_eq!(json, "\"2024-03\"");
            let parsed: YearMonth = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, month);
        }
    }

    mod grid {
        use super::*;

        #[test]
        fn march_scenario() {
            let intervals = vec![BusyInterval::new(date(2024, 3, 1), date(2024, 3, 5)).unwrap()];
            let grid = MonthGrid::build(
                YearMonth::new(2024, 3).unwrap(),
                date(2024, 2, 15),
                &intervals,
            );

            assert_eq!(grid.days.len(), 31);
            for day in 1..=4 {
                assert_eq!(grid.status_of(day), Some(DayStatus::Booked));
            }
            assert_eq!(grid.status_of(5), Some(DayStatus::Available));
            assert_eq!(grid.status_of(0), None);
            assert_eq!(grid.status_of(32), None);

            let counts = grid.counts();
            assert_eq!(counts.booked, 4);
            assert_eq!(counts.available, 27);
            assert_eq!(counts.past + counts.today, 0);
        }

        #[test]
        fn today_in_displayed_month() {
            let grid = MonthGrid::build(YearMonth::new(2026, 10).unwrap(), date(2026, 10, 17), &[]);
            let counts = grid.counts();
            assert_eq!(counts.past, 16);
            assert_eq!(counts.today, 1);
            assert_eq!(counts.available, 14);
            assert_eq!(grid.status_of(17), Some(DayStatus::Today));
        }

        #[test]
        fn weeks_layout() {
            let grid = MonthGrid::build(YearMonth::new(2024, 3).unwrap(), date(2024, 1, 1), &[]);
            let weeks = grid.weeks();

            // Friday start: 5 blanks, 31 days => 36 cells => 6 rows.
            assert_eq!(weeks.len(), 6);
            assert!(weeks[0][..5].iter().all(Option::is_none));
            assert_eq!(weeks[0][5].map(|c| c.day), Some(1));
            assert_eq!(weeks[5][0].map(|c| c.day), Some(31));
            assert!(weeks[5][1..].iter().all(Option::is_none));
        }

        #[test]
        fn weeks_exact_fit() {
            let grid = MonthGrid::build(YearMonth::new(2026, 2).unwrap(), date(2026, 1, 1), &[]);
            let weeks = grid.weeks();
            assert_eq!(weeks.len(), 4);
            assert_eq!(weeks[3][6].map(|c| c.day), Some(28));
        }
    }
}
