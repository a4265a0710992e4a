//! Busy-interval extraction from iCalendar feed text.
//!
//! Booking platforms export occupancy as iCalendar documents whose events
//! only matter for their start and end dates. This parser scans the document
//! line by line instead of building a full component tree, so truncated or
//! partially invalid exports still yield every record that can be read.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use lakecal_core::BusyInterval;
use regex::Regex;
use tracing::{debug, trace};

/// `YYYYMMDDTHHMMSS` with an optional trailing UTC marker.
static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})T(\d{2})(\d{2})(\d{2})Z?$").expect("date-time regex is valid")
});

/// Formats accepted when a value matches neither iCalendar encoding.
const FALLBACK_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];
const FALLBACK_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Pending fields of the event record being scanned.
#[derive(Debug, Default)]
struct PendingEvent {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

/// Parses feed text into busy intervals.
///
/// Never fails: records without a readable start and end date are dropped,
/// and text that is not a calendar yields an empty list. Intervals keep
/// document order.
pub fn parse_busy_intervals(text: &str) -> Vec<BusyInterval> {
    let mut intervals = Vec::new();
    let mut current: Option<PendingEvent> = None;
    let mut dropped = 0usize;

    for line in unfold_lines(text) {
        let line = line.trim();
        let Some((name, value)) = split_property(line) else {
            continue;
        };

        match name.to_ascii_uppercase().as_str() {
            "BEGIN" if value.trim().eq_ignore_ascii_case("VEVENT") => {
                current = Some(PendingEvent::default());
            }
            "END" if value.trim().eq_ignore_ascii_case("VEVENT") => {
                let Some(event) = current.take() else {
                    continue;
                };
                match complete_event(event) {
                    Some(interval) => {
                        trace!(start = %interval.start, end = %interval.end, "Parsed busy interval");
                        intervals.push(interval);
                    }
                    None => dropped += 1,
                }
            }
            "DTSTART" => {
                if let Some(event) = current.as_mut() {
                    event.start = extract_date(line);
                }
            }
            "DTEND" => {
                if let Some(event) = current.as_mut() {
                    event.end = extract_date(line);
                }
            }
            _ => {}
        }
    }

    if current.is_some() {
        dropped += 1;
    }

    debug!(
        intervals = intervals.len(),
        dropped = dropped,
        "Parsed calendar feed"
    );
    intervals
}

/// Turns a finished record into an interval if both dates are usable.
fn complete_event(event: PendingEvent) -> Option<BusyInterval> {
    match (event.start, event.end) {
        (Some(start), Some(end)) => {
            let interval = BusyInterval::new(start, end);
            if interval.is_none() {
                debug!(%start, %end, "Dropping event that ends before it starts");
            }
            interval
        }
        (start, end) => {
            debug!(?start, ?end, "Dropping event without both dates");
            None
        }
    }
}

/// Joins folded continuation lines (leading space or tab) onto their parent.
///
/// An indented line that reads as a record boundary or date property once
/// trimmed is its own line, not a continuation.
fn unfold_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for raw in text.lines() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let continuation = raw
            .strip_prefix([' ', '\t'])
            .filter(|rest| !starts_content_line(rest.trim_start()));
        match (continuation, lines.last_mut()) {
            (Some(continuation), Some(previous)) => previous.push_str(continuation),
            _ => lines.push(raw.to_string()),
        }
    }
    lines
}

/// Returns true if `line` opens one of the properties the parser acts on.
fn starts_content_line(line: &str) -> bool {
    let Some((name, _)) = split_property(line) else {
        return false;
    };
    ["BEGIN", "END", "DTSTART", "DTEND"]
        .iter()
        .any(|known| name.eq_ignore_ascii_case(known))
}

/// Splits a content line into its property name and the rest after the name.
///
/// The name ends at the first `:` or `;`; lines without either are not
/// properties.
fn split_property(line: &str) -> Option<(&str, &str)> {
    let idx = line.find([':', ';'])?;
    Some((&line[..idx], &line[idx + 1..]))
}

/// Extracts the date from a `DTSTART`/`DTEND` line, ignoring parameters.
pub fn extract_date(line: &str) -> Option<NaiveDate> {
    let value = extract_value(line)?;
    let date = parse_feed_date(value);
    if date.is_none() {
        debug!(value = %value, "Could not parse date value");
    }
    date
}

/// Returns the value segment of a property line.
///
/// The value follows the last `:`; anything still attached with `;` is a
/// parameter and is stripped.
pub fn extract_value(line: &str) -> Option<&str> {
    let value = line.rsplit(':').next()?;
    let value = value.rsplit(';').next()?.trim();
    (!value.is_empty()).then_some(value)
}

/// Parses a single date value into a calendar date.
///
/// Accepts `YYYYMMDD`, `YYYYMMDDTHHMMSS[Z]` (time discarded) and, as a
/// fallback, common ISO-8601 and RFC 2822 renderings.
pub fn parse_feed_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if value.len() == 8 && value.bytes().all(|b| b.is_ascii_digit()) {
        return NaiveDate::parse_from_str(value, "%Y%m%d").ok();
    }

    if let Some(caps) = DATE_TIME.captures(value) {
        let number = |i: usize| caps[i].parse::<u32>().ok();
        let date = NaiveDate::from_ymd_opt(caps[1].parse().ok()?, number(2)?, number(3)?)?;
        // Reject impossible clock times even though the time is discarded.
        NaiveTime::from_hms_opt(number(4)?, number(5)?, number(6)?)?;
        return Some(date);
    }

    parse_generic_date(value)
}

fn parse_generic_date(value: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.date_naive());
    }
    FALLBACK_DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        })
}
