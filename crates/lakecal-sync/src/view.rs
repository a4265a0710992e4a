//! Availability view: one displayed apartment and its feed.
//!
//! Selecting a source recreates the [`SyncState`] and starts a sync.
//! Every sync captures the view's generation. A response that completes
//! after a newer `select`, `refresh` or `close` is discarded, so a slow
//! feed can never overwrite the state of the apartment now on screen.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::{debug, info};

use lakecal_core::{FeedSource, MonthGrid, YearMonth};
use lakecal_feeds::{FeedFetch, FeedFetcher, parse_busy_intervals};

use crate::state::{SyncOutcome, SyncState};

#[derive(Debug, Default)]
struct ViewInner {
    generation: u64,
    state: Option<SyncState>,
}

/// The availability view.
///
/// Cloning yields another handle to the same view.
#[derive(Clone)]
pub struct AvailabilityView {
    fetcher: Arc<dyn FeedFetcher>,
    inner: Arc<RwLock<ViewInner>>,
}

impl AvailabilityView {
    pub fn new(fetcher: Arc<dyn FeedFetcher>) -> Self {
        Self {
            fetcher,
            inner: Arc::new(RwLock::new(ViewInner::default())),
        }
    }

    /// Switches the view to `source` and syncs it.
    ///
    /// The previous state is dropped immediately, so nothing of the old
    /// apartment is shown while the new feed loads.
    pub async fn select(&self, source: FeedSource) -> SyncOutcome {
        let generation = {
            let mut inner = self.inner.write().await;
            inner.generation += 1;
            let mut state = SyncState::new(source.clone());
            state.begin();
            inner.state = Some(state);
            inner.generation
        };

        debug!(apartment = %source.apartment_id, generation, "Selected feed source");
        self.sync(generation, source).await
    }

    /// Re-syncs the current source, keeping its intervals until the new
    /// set arrives.
    ///
    /// Returns `None` if no source is selected.
    pub async fn refresh(&self) -> Option<SyncOutcome> {
        let (generation, source) = {
            let mut guard = self.inner.write().await;
            let inner = &mut *guard;
            let state = inner.state.as_mut()?;
            inner.generation += 1;
            state.begin();
            (inner.generation, state.source.clone())
        };

        debug!(apartment = %source.apartment_id, generation, "Refreshing feed source");
        Some(self.sync(generation, source).await)
    }

    /// Tears the view down. In-flight syncs complete as stale.
    pub async fn close(&self) {
        let mut inner = self.inner.write().await;
        inner.generation += 1;
        inner.state = None;
    }

    /// Returns a copy of the current state.
    pub async fn snapshot(&self) -> Option<SyncState> {
        self.inner.read().await.state.clone()
    }

    pub async fn is_syncing(&self) -> bool {
        self.inner
            .read()
            .await
            .state
            .as_ref()
            .is_some_and(|state| state.is_syncing)
    }

    /// Classifies every day of `month` against the current intervals.
    ///
    /// Without a selected source every day is past, today or available.
    pub async fn month_grid(&self, month: YearMonth, today: NaiveDate) -> MonthGrid {
        match self.inner.read().await.state.as_ref() {
            Some(state) => state.month_grid(month, today),
            None => MonthGrid::build(month, today, &[]),
        }
    }

    async fn sync(&self, generation: u64, source: FeedSource) -> SyncOutcome {
        let fetch = self.fetcher.fetch(source.url().unwrap_or_default()).await;

        let (intervals, outcome) = match fetch {
            FeedFetch::NotConfigured => (Vec::new(), SyncOutcome::NotConfigured),
            FeedFetch::Fetched { body, route } => {
                let intervals = parse_busy_intervals(&body);
                let count = intervals.len();
                (intervals, SyncOutcome::Synced { intervals: count, route })
            }
            FeedFetch::Unavailable { failures } => (
                Vec::new(),
                SyncOutcome::Unavailable {
                    attempts: failures.len(),
                },
            ),
        };

        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            debug!(
                apartment = %source.apartment_id,
                generation,
                current = inner.generation,
                "Discarding stale feed response"
            );
            return SyncOutcome::Stale;
        }

        if let Some(state) = inner.state.as_mut() {
            state.complete(intervals, outcome.clone());
        }

        info!(
            apartment = %source.apartment_id,
            outcome = outcome.as_str(),
            "Feed sync finished"
        );
        outcome
    }
}
