//! Availability month grids.

use chrono::NaiveDate;

use lakecal_core::{
    MonthGrid, OutputFormat, OutputFormatter, SyncIndicator, YearMonth, local_today,
};

use crate::config::ClientConfig;
use crate::error::ClientResult;

/// What to show: the first month, how many, and the reference date.
#[derive(Debug, Clone, Copy)]
pub struct CalendarRange {
    pub first: YearMonth,
    pub months: u32,
    pub today: NaiveDate,
}

impl CalendarRange {
    /// Fills in the current month and the local date where not given.
    pub fn resolve(month: Option<YearMonth>, months: u32, today: Option<NaiveDate>) -> Self {
        let today = today.unwrap_or_else(local_today);
        Self {
            first: month.unwrap_or_else(|| YearMonth::containing(today)),
            months: months.max(1),
            today,
        }
    }

    /// The displayed months in order.
    pub fn months(&self) -> Vec<YearMonth> {
        std::iter::successors(Some(self.first), |month| Some(month.next()))
            .take(self.months as usize)
            .collect()
    }
}

/// Syncs an apartment's feed and prints its month grids.
pub async fn run(
    config: &ClientConfig,
    apartment_id: &str,
    range: CalendarRange,
    format: OutputFormat,
) -> ClientResult<()> {
    let apartment = super::find_apartment(config, apartment_id)?;
    let view = super::build_view(config)?;

    let outcome = view.select(apartment.feed_source()).await;
    super::note_outcome(apartment, &outcome);

    let sync = view
        .snapshot()
        .await
        .map(|state| state.sync_indicator())
        .unwrap_or(SyncIndicator::Synced);

    let mut grids = Vec::new();
    for month in range.months() {
        grids.push(view.month_grid(month, range.today).await);
    }

    println!("{}", render(&grids, sync, Some(&apartment.id), format)?);
    Ok(())
}

/// Renders grids as terminal calendars separated by blank lines, or as a
/// JSON array with one entry per month.
pub fn render(
    grids: &[MonthGrid],
    sync: SyncIndicator,
    apartment_id: Option<&str>,
    format: OutputFormat,
) -> ClientResult<String> {
    let formatter = OutputFormatter::default();
    match format {
        OutputFormat::Tty => Ok(grids
            .iter()
            .map(|grid| formatter.format_tty(grid, sync))
            .collect::<Vec<_>>()
            .join("\n\n")),
        OutputFormat::Json => {
            let calendars: Vec<_> = grids
                .iter()
                .map(|grid| formatter.format_json(grid, sync, apartment_id))
                .collect();
            super::to_json(&calendars)
        }
    }
}
