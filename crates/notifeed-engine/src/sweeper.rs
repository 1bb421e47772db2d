//! Recurring retention sweep over expired notifications.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info};

use notifeed_core::config::sweeper::SweeperConfig;
use notifeed_core::{FeedError, FeedResult};

use crate::feed::FeedEngine;

/// Timing and sizing knobs for the sweeper.
///
/// Kept as plain durations so tests can run sweeps over sub-second
/// retention windows; [`SweeperConfig`] supplies the coarse-grained
/// production values.
#[derive(Debug, Clone)]
pub struct SweepPolicy {
    /// Time between sweep runs.
    pub interval: Duration,
    /// Age beyond which notifications are deleted.
    pub retention: Duration,
    /// Maximum rows deleted per batch.
    pub batch_size: u32,
    /// Pause between batches within one run.
    pub batch_delay: Duration,
}

impl From<&SweeperConfig> for SweepPolicy {
    fn from(config: &SweeperConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_hours * 60 * 60),
            retention: Duration::from_secs(u64::from(config.retention_days) * 24 * 60 * 60),
            batch_size: config.batch_size,
            batch_delay: Duration::from_millis(config.batch_delay_ms),
        }
    }
}

/// What one sweep run accomplished.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Delete batches issued.
    pub batches: u32,
    /// Total rows removed.
    pub rows_deleted: u64,
}

/// Background task that deletes notifications older than the retention
/// window, in bounded batches.
///
/// The sweeper drives the engine's delete primitive and nothing else: no
/// cache invalidation, no publishes. Rows old enough to expire left every
/// cached page when its TTL lapsed, so deleting them needs no consistency
/// action.
#[derive(Debug)]
pub struct RetentionSweeper {
    /// Engine whose delete primitive this task drives.
    engine: Arc<FeedEngine>,
    /// Timing and sizing knobs.
    policy: SweepPolicy,
}

impl RetentionSweeper {
    /// Create a new sweeper.
    pub fn new(engine: Arc<FeedEngine>, policy: SweepPolicy) -> Self {
        Self { engine, policy }
    }

    /// Run sweeps on a fixed schedule until `shutdown` flips to `true`.
    ///
    /// The first sweep fires one full interval after startup; restarts do
    /// not trigger extra runs. A failed run is logged and retried at the
    /// next tick.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.policy.interval.as_secs(),
            retention_secs = self.policy.retention.as_secs(),
            batch_size = self.policy.batch_size,
            "Retention sweeper started"
        );

        let mut ticker = time::interval_at(
            time::Instant::now() + self.policy.interval,
            self.policy.interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    // A closed channel means the handle owner is gone; treat
                    // it like a stop request rather than spinning.
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Retention sweeper received shutdown signal");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    match self.sweep(&shutdown).await {
                        Ok(outcome) => info!(
                            batches = outcome.batches,
                            rows_deleted = outcome.rows_deleted,
                            "Retention sweep finished"
                        ),
                        Err(e) => error!(
                            error = %e,
                            "Retention sweep aborted; retrying at next interval"
                        ),
                    }
                }
            }
        }

        info!("Retention sweeper stopped");
    }

    /// Execute one sweep run to exhaustion.
    ///
    /// Issues delete batches until one comes back short, pausing between
    /// batches and checking `shutdown` before each. The cutoff is computed
    /// once, so a long run never eats into rows that aged past the window
    /// mid-sweep. Any batch failure aborts the run; re-running the same
    /// predicate later is safe.
    pub async fn sweep(&self, shutdown: &watch::Receiver<bool>) -> FeedResult<SweepOutcome> {
        let retention = chrono::Duration::from_std(self.policy.retention)
            .map_err(|e| FeedError::internal(format!("Retention window out of range: {e}")))?;
        let cutoff = Utc::now() - retention;

        let mut outcome = SweepOutcome::default();
        loop {
            if *shutdown.borrow() {
                info!(
                    batches = outcome.batches,
                    rows_deleted = outcome.rows_deleted,
                    "Stopping sweep between batches on shutdown"
                );
                break;
            }

            let deleted = self
                .engine
                .delete_expired_batch(cutoff, self.policy.batch_size)
                .await?;
            outcome.batches += 1;
            outcome.rows_deleted += deleted;

            if deleted < u64::from(self.policy.batch_size) {
                break;
            }
            time::sleep(self.policy.batch_delay).await;
        }

        Ok(outcome)
    }
}
