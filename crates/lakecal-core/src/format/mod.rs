//! Output formatting for availability calendars.
//!
//! This module provides formatters for displaying classified months:
//! - **TTY**: a Sunday-first terminal grid with one glyph per day state
//! - **JSON**: machine-readable day lists with per-status counts
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use lakecal_core::format::{FormatOptions, OutputFormatter, SyncIndicator};
//! use lakecal_core::{MonthGrid, YearMonth};
//!
//! let today = NaiveDate::from_ymd_opt(2026, 2, 10).unwrap();
//! let grid = MonthGrid::build(YearMonth::new(2026, 2).unwrap(), today, &[]);
//! let formatter = OutputFormatter::new(FormatOptions::default());
//! let text = formatter.format_tty(&grid, SyncIndicator::Synced);
//! assert!(text.starts_with("February 2026"));
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day::DayStatus;
use crate::interval::BusyInterval;
use crate::month::{DayCell, MonthGrid, StatusCounts, YearMonth};

const WEEKDAY_HEADER: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// The output format for calendar display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Human-readable terminal grid.
    #[default]
    Tty,
    /// Machine-readable JSON output.
    Json,
}

/// Whether a feed sync is still running for the displayed calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncIndicator {
    /// A fetch is in flight; the grid may change.
    Syncing,
    /// The last attempt completed, successfully or not.
    Synced,
}

impl SyncIndicator {
    /// Builds the indicator from a syncing flag.
    pub fn from_syncing(is_syncing: bool) -> Self {
        if is_syncing {
            Self::Syncing
        } else {
            Self::Synced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Syncing => "syncing",
            Self::Synced => "synced",
        }
    }
}

/// Configuration options for output formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Glyph appended to past days.
    pub past_glyph: char,
    /// Glyph appended to today.
    pub today_glyph: char,
    /// Glyph appended to booked days.
    pub booked_glyph: char,
    /// Glyph appended to available days.
    pub available_glyph: char,
    /// Whether to print the glyph legend under the grid.
    pub show_legend: bool,
    /// Whether to print the sync indicator next to the month title.
    pub show_sync_indicator: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            past_glyph: '-',
            today_glyph: '*',
            booked_glyph: 'x',
            available_glyph: ' ',
            show_legend: true,
            show_sync_indicator: true,
        }
    }
}

impl FormatOptions {
    fn glyph(&self, status: DayStatus) -> char {
        match status {
            DayStatus::Past => self.past_glyph,
            DayStatus::Today => self.today_glyph,
            DayStatus::Booked => self.booked_glyph,
            DayStatus::Available => self.available_glyph,
        }
    }
}

/// JSON output for one displayed month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonCalendar {
    /// Apartment the calendar belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apartment_id: Option<String>,
    /// Displayed month as `YYYY-MM`.
    pub month: YearMonth,
    /// Date used as "today" for classification.
    pub today: NaiveDate,
    pub sync: SyncIndicator,
    /// Blank cells before day 1 in a Sunday-first week.
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
    pub counts: StatusCounts,
}

/// JSON output for a list of busy intervals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonIntervals {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apartment_id: Option<String>,
    pub intervals: Vec<BusyInterval>,
    pub count: usize,
}

/// Output formatter for availability calendars.
#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    options: FormatOptions,
}

impl OutputFormatter {
    /// Creates a new OutputFormatter with the given options.
    pub fn new(options: FormatOptions) -> Self {
        Self { options }
    }

    /// Renders a month grid for the terminal.
    ///
    /// Each day takes three columns: the day number and its status glyph.
    /// Lines carry no trailing whitespace and the text has no final newline.
    pub fn format_tty(&self, grid: &MonthGrid, sync: SyncIndicator) -> String {
        let mut lines = Vec::new();

        let title = format!("{} {}", grid.month.name(), grid.month.year());
        if self.options.show_sync_indicator {
            lines.push(format!("{} ({})", title, sync.as_str()));
        } else {
            lines.push(title);
        }
        lines.push(WEEKDAY_HEADER.join(" "));

        for week in grid.weeks() {
            let row: String = week
                .iter()
                .map(|cell| match cell {
                    Some(cell) => format!("{:>2}{}", cell.day, self.options.glyph(cell.status)),
                    None => "   ".to_string(),
                })
                .collect();
            lines.push(row.trim_end().to_string());
        }

        if self.options.show_legend {
            lines.push(format!(
                "{} past  {} today  {} booked",
                self.options.past_glyph, self.options.today_glyph, self.options.booked_glyph
            ));
        }

        lines.join("\n")
    }

    /// Builds the JSON structure for a month grid.
    pub fn format_json(
        &self,
        grid: &MonthGrid,
        sync: SyncIndicator,
        apartment_id: Option<&str>,
    ) -> JsonCalendar {
        JsonCalendar {
            apartment_id: apartment_id.map(str::to_string),
            month: grid.month,
            today: grid.today,
            sync,
            leading_blanks: grid.leading_blanks(),
            days: grid.days.clone(),
            counts: grid.counts(),
        }
    }

    /// Renders busy intervals one per line, or a placeholder when empty.
    pub fn format_intervals_tty(&self, intervals: &[BusyInterval]) -> String {
        if intervals.is_empty() {
            return "No busy intervals".to_string();
        }

        intervals
            .iter()
            .map(|interval| {
                let nights = interval.nights();
                format!(
                    "{} -> {} ({} night{})",
                    interval.start,
                    interval.end,
                    nights,
                    if nights == 1 { "" } else { "s" }
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Builds the JSON structure for a list of intervals.
    pub fn format_intervals_json(
        &self,
        intervals: &[BusyInterval],
        apartment_id: Option<&str>,
    ) -> JsonIntervals {
        JsonIntervals {
            apartment_id: apartment_id.map(str::to_string),
            intervals: intervals.to_vec(),
            count: intervals.len(),
        }
    }
}

#[cfg(test)]
mod golden_tests;
