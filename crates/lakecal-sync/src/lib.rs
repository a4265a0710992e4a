//! Availability view: sync state, superseding syncs, periodic refresh.
//!
//! This crate ties feed retrieval and parsing to a displayed apartment:
//! - [`AvailabilityView`] owns the [`SyncState`] of the selected feed and
//!   discards responses that arrive after the view moved on
//! - [`Scheduler`] re-runs a sync on an interval with jitter and backoff
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lakecal_core::{FeedSource, YearMonth, local_today};
//! use lakecal_feeds::{FeedRetriever, RetrieverConfig};
//! use lakecal_sync::AvailabilityView;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let retriever = FeedRetriever::new(RetrieverConfig::default())?;
//!     let view = AvailabilityView::new(Arc::new(retriever));
//!
//!     view.select(FeedSource::new("lakeside", "https://www.airbnb.com/calendar/ical/1.ics"))
//!         .await;
//!     let today = local_today();
//!     let grid = view.month_grid(YearMonth::containing(today), today).await;
//!     println!("{} booked days", grid.counts().booked);
//!     Ok(())
//! }
//! ```

mod scheduler;
mod state;
mod view;

pub use scheduler::{
    Scheduler, SchedulerCommand, SchedulerConfig, SchedulerHandle, SchedulerState,
    SharedSchedulerState,
};
pub use state::{SyncOutcome, SyncState};
pub use view::AvailabilityView;
