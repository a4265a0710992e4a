//! Periodic re-sync of one apartment's feed.

use std::time::Duration;

use chrono::Local;
use tracing::{debug, info};

use lakecal_sync::{Scheduler, SchedulerConfig};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Resolves the sync interval from the flag or the config file.
pub fn interval(config: &ClientConfig, flag: Option<u64>) -> ClientResult<Duration> {
    match flag.unwrap_or(config.watch.interval_secs) {
        0 => Err(ClientError::Usage(
            "the watch interval must be greater than zero".to_string(),
        )),
        secs => Ok(Duration::from_secs(secs)),
    }
}

/// Syncs the apartment's feed on an interval, printing a summary line after
/// each attempt, until interrupted.
pub async fn run(config: &ClientConfig, apartment_id: &str, flag: Option<u64>) -> ClientResult<()> {
    let apartment = super::find_apartment(config, apartment_id)?;
    let every = interval(config, flag)?;
    let view = super::build_view(config)?;

    let scheduler = Scheduler::new(SchedulerConfig::new(every));
    let handle = scheduler.handle();

    let source = apartment.feed_source();
    let name = apartment.display_name().to_string();
    let task = tokio::spawn(scheduler.run(move || {
        let view = view.clone();
        let source = source.clone();
        let name = name.clone();
        async move {
            let outcome = match view.refresh().await {
                Some(outcome) => outcome,
                None => view.select(source).await,
            };
            println!(
                "{} {}: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                name,
                super::describe_outcome(&outcome)
            );
            outcome
        }
    }));

    info!(apartment = apartment_id, interval_secs = every.as_secs(), "Watching feed");
    tokio::signal::ctrl_c().await?;
    info!("Interrupted, stopping");

    if handle.stop().await.is_err() {
        debug!("Scheduler already stopped");
    }
    task.await
        .map_err(|e| ClientError::Output(format!("watch task failed: {}", e)))
}
