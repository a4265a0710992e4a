//! Calendar feed retrieval and parsing.
//!
//! This crate turns a published iCalendar feed URL into busy intervals:
//!
//! - [`FeedRetriever`] - Fetches the feed text through forwarding proxies,
//!   falling back to a direct request
//! - [`FeedFetcher`] - The retrieval seam, implemented by [`FeedRetriever`]
//!   and by test doubles
//! - [`parse_busy_intervals`] - Line-based extraction of booked ranges
//!
//! # Architecture
//!
//! ```text
//!   feed URL
//!      │
//!      ▼
//! ┌──────────────────┐  proxy 1 ─► proxy 2 ─► ... ─► direct
//! │  FeedRetriever   │
//! └────────┬─────────┘
//!          │ FeedFetch::Fetched { body }
//!          ▼
//! ┌──────────────────────┐
//! │ parse_busy_intervals │
//! └────────┬─────────────┘
//!          ▼
//!   Vec<BusyInterval>
//! ```

pub mod config;
pub mod error;
pub mod ics;
pub mod retriever;

pub use config::{ProxyEndpoint, RetrieverConfig};
pub use error::{FeedError, FeedErrorCode, FeedResult};
pub use ics::{extract_date, extract_value, parse_busy_intervals, parse_feed_date};
pub use retriever::{BoxFuture, FeedFetch, FeedFetcher, FeedRetriever, FetchRoute};
