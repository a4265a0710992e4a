//! Command implementations.

pub mod apartments;
pub mod calendar;
pub mod config;
pub mod intervals;
pub mod parse;
pub mod watch;

use std::sync::Arc;

use serde::Serialize;

use lakecal_core::Apartment;
use lakecal_feeds::FeedRetriever;
use lakecal_sync::{AvailabilityView, SyncOutcome};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Looks up `id` in the catalog.
pub(crate) fn find_apartment<'a>(config: &'a ClientConfig, id: &str) -> ClientResult<&'a Apartment> {
    config
        .apartment(id)
        .ok_or_else(|| ClientError::UnknownApartment(id.to_string()))
}

/// Builds an availability view backed by the configured retriever.
///
/// Fails with the same errors as `config validate`.
pub(crate) fn build_view(config: &ClientConfig) -> ClientResult<AvailabilityView> {
    config.validate().map_err(ClientError::Config)?;
    let retriever = FeedRetriever::new(config.retriever.to_retriever_config())?;
    Ok(AvailabilityView::new(Arc::new(retriever)))
}

pub(crate) fn to_json<T: Serialize>(value: &T) -> ClientResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// One-line description of a sync outcome.
pub fn describe_outcome(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::NotConfigured => {
            "no feed configured, every future day is available".to_string()
        }
        SyncOutcome::Synced { intervals, route } => format!(
            "synced {} busy interval{} via {}",
            intervals,
            if *intervals == 1 { "" } else { "s" },
            route
        ),
        SyncOutcome::Unavailable { attempts } => format!(
            "feed unavailable after {} attempt{}, showing no bookings",
            attempts,
            if *attempts == 1 { "" } else { "s" }
        ),
        SyncOutcome::Stale => "sync superseded by a newer one".to_string(),
    }
}

/// Notes a sync that produced no data on stderr, keeping stdout clean.
pub(crate) fn note_outcome(apartment: &Apartment, outcome: &SyncOutcome) {
    if matches!(
        outcome,
        SyncOutcome::NotConfigured | SyncOutcome::Unavailable { .. }
    ) {
        eprintln!("{}: {}", apartment.display_name(), describe_outcome(outcome));
    }
}

#[cfg(test)]
mod tests {
    use lakecal_feeds::FetchRoute;

    use super::*;

    #[test]
    fn describe_outcomes() {
        assert_eq!(
            describe_outcome(&SyncOutcome::Synced {
                intervals: 1,
                route: FetchRoute::Proxy("allorigins".to_string()),
            }),
            "synced 1 busy interval via proxy allorigins"
        );
        assert_eq!(
            describe_outcome(&SyncOutcome::Synced {
                intervals: 3,
                route: FetchRoute::Direct,
            }),
            "synced 3 busy intervals via direct"
        );
        assert_eq!(
            describe_outcome(&SyncOutcome::Unavailable { attempts: 4 }),
            "feed unavailable after 4 attempts, showing no bookings"
        );
    }

    #[test]
    fn invalid_config_builds_no_view() {
        let mut config = ClientConfig::default();
        config.retriever.timeout_secs = 0;

        let result = build_view(&config);
        assert!(matches!(result, Err(ClientError::Config(ref msg)) if msg.contains("timeout_secs")));

        assert!(build_view(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn unknown_apartment() {
        let config = ClientConfig::default();
        let err = find_apartment(&config, "ghost").unwrap_err();
        assert!(matches!(err, ClientError::UnknownApartment(ref id) if id == "ghost"));
    }
}
