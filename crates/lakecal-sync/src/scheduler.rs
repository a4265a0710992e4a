//! Periodic feed refresh.
//!
//! The scheduler runs a sync closure on an interval with jitter. Consecutive
//! unavailable feeds switch it to exponential backoff until a sync succeeds
//! again.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, warn};

use crate::state::SyncOutcome;

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Base interval between syncs.
    pub sync_interval: Duration,
    /// Maximum jitter as a fraction of the interval (0.0-1.0).
    pub jitter_fraction: f64,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub backoff_multiplier: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            sync_interval: Duration::from_secs(900),
            jitter_fraction: 0.1,
            initial_backoff: Duration::from_secs(30),
            max_backoff: Duration::from_secs(900),
            backoff_multiplier: 2.0,
        }
    }
}

impl SchedulerConfig {
    pub fn new(sync_interval: Duration) -> Self {
        Self {
            sync_interval,
            ..Default::default()
        }
    }

    pub fn with_jitter(mut self, fraction: f64) -> Self {
        self.jitter_fraction = fraction.clamp(0.0, 1.0);
        self
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration, multiplier: f64) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self.backoff_multiplier = multiplier;
        self
    }

    /// The interval plus or minus a random share of `jitter_fraction`.
    pub fn next_sync_delay(&self) -> Duration {
        let base = self.sync_interval.as_secs_f64();
        let jitter = time_jitter(base * self.jitter_fraction);
        Duration::from_secs_f64((base + jitter).max(0.0))
    }

    /// Delay after `failures` consecutive unavailable syncs.
    pub fn backoff_delay(&self, failures: u32) -> Duration {
        if failures == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(failures - 1).unwrap_or(i32::MAX);
        let delay = self.initial_backoff.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::from_secs_f64(delay.min(self.max_backoff.as_secs_f64()))
    }
}

/// Value in [-range, range] derived from the clock's sub-second nanos.
fn time_jitter(range: f64) -> f64 {
    use std::time::SystemTime;

    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();

    let fraction = f64::from(nanos) / 1_000_000_000.0;
    (fraction * 2.0 - 1.0) * range
}

/// Commands accepted by a running scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCommand {
    /// Sync immediately and restart the interval.
    SyncNow,
    Stop,
}

/// Counters kept by the scheduler.
#[derive(Debug, Clone, Default)]
pub struct SchedulerState {
    /// Completed sync attempts, stale ones included.
    pub attempts: u64,
    /// Unavailable syncs since the last non-failing one.
    pub consecutive_failures: u32,
    pub last_attempt: Option<DateTime<Utc>>,
    pub last_outcome: Option<SyncOutcome>,
}

impl SchedulerState {
    /// Records the outcome of one sync.
    pub fn record(&mut self, outcome: SyncOutcome) {
        self.attempts += 1;
        self.last_attempt = Some(Utc::now());
        if outcome.is_failure() {
            self.consecutive_failures += 1;
        } else if outcome != SyncOutcome::Stale {
            self.consecutive_failures = 0;
        }
        self.last_outcome = Some(outcome);
    }
}

pub type SharedSchedulerState = Arc<RwLock<SchedulerState>>;

/// Runs a sync closure periodically until stopped.
pub struct Scheduler {
    config: SchedulerConfig,
    state: SharedSchedulerState,
    command_tx: mpsc::Sender<SchedulerCommand>,
    command_rx: mpsc::Receiver<SchedulerCommand>,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(8);
        Self {
            config,
            state: Arc::new(RwLock::new(SchedulerState::default())),
            command_tx,
            command_rx,
        }
    }

    /// Returns a handle for sending commands to the scheduler.
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            command_tx: self.command_tx.clone(),
            state: self.state.clone(),
        }
    }

    /// Syncs once, then keeps syncing until a `Stop` command arrives or
    /// every handle is dropped.
    pub async fn run<F, Fut>(self, sync_fn: F)
    where
        F: Fn() -> Fut + Send + Sync,
        Fut: Future<Output = SyncOutcome> + Send,
    {
        let Self {
            config,
            state,
            command_tx,
            mut command_rx,
        } = self;
        // Only external handles keep the channel open.
        drop(command_tx);

        info!(
            interval_secs = config.sync_interval.as_secs(),
            "Scheduler started"
        );

        Self::sync_once(&state, &sync_fn).await;

        loop {
            let delay = Self::next_delay(&config, &state).await;
            debug!(delay_secs = delay.as_secs(), "Scheduling next sync");

            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    Self::sync_once(&state, &sync_fn).await;
                }
                cmd = command_rx.recv() => match cmd {
                    Some(SchedulerCommand::SyncNow) => {
                        debug!("Received SyncNow command");
                        Self::sync_once(&state, &sync_fn).await;
                    }
                    Some(SchedulerCommand::Stop) | None => {
                        info!("Scheduler stopping");
                        break;
                    }
                },
            }
        }
    }

    async fn next_delay(config: &SchedulerConfig, state: &SharedSchedulerState) -> Duration {
        let failures = state.read().await.consecutive_failures;
        if failures > 0 {
            let backoff = config.backoff_delay(failures);
            debug!(
                failures,
                backoff_secs = backoff.as_secs(),
                "Feed unavailable, backing off"
            );
            return backoff;
        }
        config.next_sync_delay()
    }

    async fn sync_once<F, Fut>(state: &SharedSchedulerState, sync_fn: &F)
    where
        F: Fn() -> Fut,
        Fut: Future<Output = SyncOutcome>,
    {
        let outcome = sync_fn().await;
        if outcome.is_failure() {
            warn!(outcome = outcome.as_str(), "Scheduled sync failed");
        } else {
            debug!(outcome = outcome.as_str(), "Scheduled sync completed");
        }
        state.write().await.record(outcome);
    }
}

/// Handle for sending commands to a running scheduler.
#[derive(Clone, Debug)]
pub struct SchedulerHandle {
    command_tx: mpsc::Sender<SchedulerCommand>,
    state: SharedSchedulerState,
}

impl SchedulerHandle {
    pub async fn sync_now(&self) -> Result<(), mpsc::error::SendError<SchedulerCommand>> {
        self.command_tx.send(SchedulerCommand::SyncNow).await
    }

    pub async fn stop(&self) -> Result<(), mpsc::error::SendError<SchedulerCommand>> {
        self.command_tx.send(SchedulerCommand::Stop).await
    }

    pub async fn state(&self) -> SchedulerState {
        self.state.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use lakecal_feeds::FetchRoute;

    use super::*;

    fn synced() -> SyncOutcome {
        SyncOutcome::Synced {
            intervals: 0,
            route: FetchRoute::Direct,
        }
    }

    #[test]
    fn next_sync_delay_stays_within_jitter() {
        let config = SchedulerConfig::new(Duration::from_secs(60)).with_jitter(0.1);
        let delay = config.next_sync_delay().as_secs_f64();
        assert!((54.0..=66.0).contains(&delay));

        let config = config.with_jitter(0.0);
        assert_eq!(config.next_sync_delay(), Duration::from_secs(60));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let config = SchedulerConfig::default().with_backoff(
            Duration::from_secs(30),
            Duration::from_secs(600),
            2.0,
        );

        assert_eq!(config.backoff_delay(0), Duration::ZERO);
        assert_eq!(config.backoff_delay(1), Duration::from_secs(30));
        assert_eq!(config.backoff_delay(2), Duration::from_secs(60));
        assert_eq!(config.backoff_delay(3), Duration::from_secs(120));
        assert_eq!(config.backoff_delay(8), Duration::from_secs(600));
    }

    #[test]
    fn state_counts_failures() {
        let mut state = SchedulerState::default();

        state.record(SyncOutcome::Unavailable { attempts: 4 });
        state.record(SyncOutcome::Unavailable { attempts: 4 });
        assert_eq!(state.consecutive_failures, 2);

        state.record(SyncOutcome::Stale);
        assert_eq!(state.consecutive_failures, 2);

        state.record(SyncOutcome::NotConfigured);
        assert_eq!(state.consecutive_failures, 0);
        assert_eq!(state.attempts, 4);
        assert_eq!(state.last_outcome, Some(SyncOutcome::NotConfigured));
    }

    #[tokio::test]
    async fn sync_now_and_stop() {
        let scheduler = Scheduler::new(SchedulerConfig::new(Duration::from_secs(3600)));
        let handle = scheduler.handle();

        let count = Arc::new(AtomicU32::new(0));
        let task = {
            let count = count.clone();
            tokio::spawn(scheduler.run(move || {
                let count = count.clone();
                async move {
                    count.fetch_add(1, Ordering::SeqCst);
                    synced()
                }
            }))
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);

        handle.sync_now().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(handle.state().await.attempts, 2);

        handle.stop().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn backs_off_then_recovers() {
        let config = SchedulerConfig::new(Duration::from_secs(3600)).with_backoff(
            Duration::from_millis(10),
            Duration::from_millis(40),
            2.0,
        );
        let scheduler = Scheduler::new(config);
        let handle = scheduler.handle();

        let calls = Arc::new(AtomicU32::new(0));
        let task = {
            let calls = calls.clone();
            tokio::spawn(scheduler.run(move || {
                let calls = calls.clone();
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 3 {
                        SyncOutcome::Unavailable { attempts: 1 }
                    } else {
                        synced()
                    }
                }
            }))
        };

        tokio::time::sleep(Duration::from_millis(300)).await;

        // Three failures retried on backoff, then the long interval applies.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        let state = handle.state().await;
        assert_eq!(state.consecutive_failures, 0);
        assert_eq!(state.last_outcome, Some(synced()));

        handle.stop().await.unwrap();
        task.await.unwrap();
    }

    #[tokio::test]
    async fn dropping_every_handle_stops_the_loop() {
        let scheduler = Scheduler::new(SchedulerConfig::new(Duration::from_secs(3600)));
        let handle = scheduler.handle();
        let task = tokio::spawn(scheduler.run(|| async { SyncOutcome::NotConfigured }));

        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(handle);
        task.await.unwrap();
    }
}
