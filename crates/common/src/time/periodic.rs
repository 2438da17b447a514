//! Grid-aligned periodic task runner
//!
//! A [`PeriodicTask`] runs an async unit of work whenever wall-clock time
//! crosses a multiple of its interval, counted from the Unix epoch. With a
//! five minute interval runs land on `:00`, `:05`, `:10`, ... no matter when
//! the runner was started.
//!
//! The next boundary is computed after each run completes, so a run that
//! overshoots its interval skips the boundaries it missed instead of queueing
//! them. Cancellation is observed while waiting and before each run; a run
//! that already started is never interrupted.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use busylight_common::time::{PeriodicTask, SystemClock};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let cancel = CancellationToken::new();
//! let task = PeriodicTask::new("heartbeat", Duration::from_secs(60), Arc::new(SystemClock), || async {
//!     Ok::<(), String>(())
//! });
//! let handle = task.start(cancel.clone());
//!
//! cancel.cancel();
//! let _ = handle.await;
//! # }
//! ```

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::clock::Clock;

/// Interval used when a runner is configured with a zero interval.
pub const DEFAULT_TASK_INTERVAL: Duration = Duration::from_secs(60);

/// First instant strictly after `now` that is a whole multiple of `interval`
/// on the Unix-epoch millisecond grid.
///
/// Sub-millisecond intervals are treated as one millisecond.
pub fn next_boundary(now: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    let step = i64::try_from(interval.as_millis()).unwrap_or(i64::MAX).max(1);
    let next = now.timestamp_millis().div_euclid(step).saturating_mul(step).saturating_add(step);

    DateTime::from_timestamp_millis(next).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Async unit of work repeated on interval boundaries.
pub struct PeriodicTask<F> {
    name: String,
    interval: Duration,
    clock: Arc<dyn Clock>,
    task: F,
}

impl<F, Fut, E> PeriodicTask<F>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    pub fn new(name: impl Into<String>, interval: Duration, clock: Arc<dyn Clock>, task: F) -> Self {
        let interval = if interval.is_zero() { DEFAULT_TASK_INTERVAL } else { interval };
        Self { name: name.into(), interval, clock, task }
    }

    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the runner on the current tokio runtime.
    ///
    /// The returned handle resolves once `cancel` fired and any in-flight run
    /// finished.
    pub fn start(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    /// Drive the runner on the calling task until `cancel` fires.
    #[instrument(skip_all, fields(task = %self.name, interval_ms = self.interval.as_millis()))]
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            let now = self.clock.now();
            let boundary = next_boundary(now, self.interval);
            let wait = (boundary - now).to_std().unwrap_or_default();
            debug!(next_run = %boundary, "waiting for next boundary");

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(wait) => {}
            }

            if cancel.is_cancelled() {
                break;
            }

            let started = Instant::now();
            info!("task started");
            match (self.task)().await {
                Ok(()) => {
                    info!(elapsed_ms = started.elapsed().as_millis(), "task finished");
                }
                Err(e) => {
                    warn!(error = %e, elapsed_ms = started.elapsed().as_millis(), "task failed");
                }
            }
        }

        info!("task stopped");
    }
}
