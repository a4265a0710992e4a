//! Golden tests for calendar formatting.
//!
//! These tests use insta inline snapshots to keep the rendered grid stable.
//! Run with `cargo insta review` to update snapshots after intentional changes.

use chrono::NaiveDate;

use crate::format::{FormatOptions, OutputFormatter, SyncIndicator};
use crate::interval::BusyInterval;
use crate::month::{MonthGrid, YearMonth};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn interval(start: NaiveDate, end: NaiveDate) -> BusyInterval {
    BusyInterval::new(start, end).unwrap()
}

#[test]
fn golden_tty_month_with_today_and_booking() {
    let grid = MonthGrid::build(
        YearMonth::new(2026, 2).unwrap(),
        date(2026, 2, 10),
        &[interval(date(2026, 2, 14), date(2026, 2, 17))],
    );

    let output = OutputFormatter::default().format_tty(&grid, SyncIndicator::Synced);

    insta::assert_snapshot!(output, @r"
February 2026 (synced)
Su Mo Tu We Th Fr Sa
 1- 2- 3- 4- 5- 6- 7-
 8- 9-10*11 12 13 14x
15x16x17 18 19 20 21
22 23 24 25 26 27 28
- past  * today  x booked
");
}

#[test]
fn golden_tty_leading_blanks() {
    let grid = MonthGrid::build(
        YearMonth::new(2024, 3).unwrap(),
        date(2024, 2, 15),
        &[interval(date(2024, 3, 1), date(2024, 3, 5))],
    );

    let output = OutputFormatter::default().format_tty(&grid, SyncIndicator::Syncing);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines[0], "March 2024 (syncing)");
    assert_eq!(lines[2], "                1x 2x");
    assert_eq!(lines[3], " 3x 4x 5  6  7  8  9");
    assert_eq!(lines[7], "31");
    assert_eq!(lines.len(), 9);
}

#[test]
fn golden_tty_without_decorations() {
    let options = FormatOptions {
        show_legend: false,
        show_sync_indicator: false,
        ..FormatOptions::default()
    };
    let grid = MonthGrid::build(YearMonth::new(2026, 2).unwrap(), date(2026, 1, 1), &[]);

    let output = OutputFormatter::new(options).format_tty(&grid, SyncIndicator::Synced);

    assert_eq!(output.lines().next(), Some("February 2026"));
    assert_eq!(output.lines().last(), Some("22 23 24 25 26 27 28"));
}

#[test]
fn golden_json_intervals() {
    let output = OutputFormatter::default().format_intervals_json(
        &[interval(date(2024, 3, 1), date(2024, 3, 5))],
        Some("lago"),
    );

    insta::assert_json_snapshot!(output, @r#"
    {
      "apartment_id": "lago",
      "intervals": [
        {
          "start": "2024-03-01",
          "end": "2024-03-05"
        }
      ],
      "count": 1
    }
    "#);
}

#[test]
fn golden_json_calendar_counts() {
    let grid = MonthGrid::build(
        YearMonth::new(2024, 3).unwrap(),
        date(2024, 3, 2),
        &[interval(date(2024, 3, 1), date(2024, 3, 5))],
    );

    let output = OutputFormatter::default().format_json(&grid, SyncIndicator::Synced, None);
    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json["month"], "2024-03");
    assert_eq!(json["today"], "2024-03-02");
    assert_eq!(json["sync"], "synced");
    assert_eq!(json["leading_blanks"], 5);
    assert_eq!(json["days"][0]["status"], "past");
    assert_eq!(json["days"][1]["status"], "today");
    assert_eq!(json["days"][2]["status"], "booked");
    assert_eq!(json["days"][4]["status"], "available");
    assert_eq!(json["counts"]["booked"], 2);
    assert!(json.get("apartment_id").is_none());
}

#[test]
fn golden_tty_intervals() {
    let formatter = OutputFormatter::default();
    assert_eq!(formatter.format_intervals_tty(&[]), "No busy intervals");

    let output = formatter.format_intervals_tty(&[
        interval(date(2024, 3, 1), date(2024, 3, 2)),
        interval(date(2024, 3, 10), date(2024, 3, 14)),
    ]);
    assert_eq!(
        output,
        "2024-03-01 -> 2024-03-02 (1 night)\n2024-03-10 -> 2024-03-14 (4 nights)"
    );
}
