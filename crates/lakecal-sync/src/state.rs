//! Per-view sync state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use lakecal_core::{BusyInterval, FeedSource, MonthGrid, SyncIndicator, YearMonth};
use lakecal_feeds::FetchRoute;

/// Result of one sync attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// The source has no usable feed URL. No request was made.
    NotConfigured,
    /// A document was retrieved and parsed.
    Synced { intervals: usize, route: FetchRoute },
    /// Every retrieval attempt failed.
    Unavailable { attempts: usize },
    /// The view moved on before the response arrived. Nothing was stored.
    Stale,
}

impl SyncOutcome {
    /// Returns true if the attempt should count against the feed's health.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotConfigured => "not_configured",
            Self::Synced { .. } => "synced",
            Self::Unavailable { .. } => "unavailable",
            Self::Stale => "stale",
        }
    }
}

/// Sync state of one displayed apartment and feed.
///
/// A fresh state is created whenever the view switches source. Completed
/// attempts replace the interval set wholesale.
#[derive(Debug, Clone, Serialize)]
pub struct SyncState {
    pub source: FeedSource,
    /// True between the start of a fetch and its completion.
    pub is_syncing: bool,
    /// When the most recent attempt completed, successful or not.
    pub last_synced_at: Option<DateTime<Utc>>,
    /// Busy intervals from the last completed attempt.
    pub intervals: Vec<BusyInterval>,
    /// Diagnostic classification of the last completed attempt.
    pub last_outcome: Option<SyncOutcome>,
}

impl SyncState {
    pub fn new(source: FeedSource) -> Self {
        Self {
            source,
            is_syncing: false,
            last_synced_at: None,
            intervals: Vec::new(),
            last_outcome: None,
        }
    }

    /// Marks a fetch as in flight.
    pub fn begin(&mut self) {
        self.is_syncing = true;
    }

    /// Stores the result of a completed attempt.
    pub fn complete(&mut self, intervals: Vec<BusyInterval>, outcome: SyncOutcome) {
        self.intervals = intervals;
        self.last_outcome = Some(outcome);
        self.last_synced_at = Some(Utc::now());
        self.is_syncing = false;
    }

    pub fn sync_indicator(&self) -> SyncIndicator {
        SyncIndicator::from_syncing(self.is_syncing)
    }

    pub fn month_grid(&self, month: YearMonth, today: NaiveDate) -> MonthGrid {
        MonthGrid::build(month, today, &self.intervals)
    }
}

#[cfg(test)]
mod tests {
    use lakecal_core::DayStatus;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn march_status(state: &SyncState, day: u32) -> Option<DayStatus> {
        state
            .month_grid(YearMonth::new(2024, 3).unwrap(), date(2024, 2, 1))
            .status_of(day)
    }

    #[test]
    fn new_state_is_empty() {
        let state = SyncState::new(FeedSource::unconfigured("cabin"));
        assert!(!state.is_syncing);
        assert!(state.last_synced_at.is_none());
        assert!(state.intervals.is_empty());
        assert!(state.last_outcome.is_none());
        assert_eq!(state.sync_indicator(), SyncIndicator::Synced);
    }

    #[test]
    fn complete_replaces_intervals() {
        let mut state = SyncState::new(FeedSource::new("cabin", "https://feeds.example.org/a.ics"));
        state.begin();
        assert_eq!(state.sync_indicator(), SyncIndicator::Syncing);

        let first = BusyInterval::new(date(2024, 3, 1), date(2024, 3, 5)).unwrap();
        state.complete(
            vec![first],
            SyncOutcome::Synced { intervals: 1, route: FetchRoute::Direct },
        );
        assert!(!state.is_syncing);
        assert!(state.last_synced_at.is_some());
        assert_eq!(march_status(&state, 2), Some(DayStatus::Booked));

        state.begin();
        state.complete(Vec::new(), SyncOutcome::Unavailable { attempts: 4 });
        assert!(state.intervals.is_empty());
        assert_eq!(march_status(&state, 2), Some(DayStatus::Available));
        assert!(state.last_outcome.as_ref().unwrap().is_failure());
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let outcome = SyncOutcome::Synced {
            intervals: 2,
            route: FetchRoute::Proxy("allorigins".to_string()),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "synced",
                "intervals": 2,
                "route": { "kind": "proxy", "name": "allorigins" }
            })
        );
        assert_eq!(
            serde_json::to_value(SyncOutcome::NotConfigured).unwrap(),
            serde_json::json!({ "status": "not_configured" })
        );
    }
}
