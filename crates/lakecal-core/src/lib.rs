//! Core types: busy intervals, day classification, month grids, formatting

pub mod day;
pub mod format;
pub mod interval;
pub mod month;
pub mod source;
pub mod tracing;

pub use day::{DayStatus, classify_day, local_today};
pub use format::{
    FormatOptions, JsonCalendar, JsonIntervals, OutputFormat, OutputFormatter, SyncIndicator,
};
pub use interval::{BusyInterval, is_booked};
pub use month::{DayCell, MonthGrid, MonthParseError, StatusCounts, YearMonth};
pub use source::{Apartment, FeedSource};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
