//! Two-speed tick orchestration
//!
//! A slow "fetch" runner pulls events from the calendar into the
//! consolidator, a fast "tick" runner turns the consolidated span into a
//! [`DisplayState`] and hands it to the display handler. Both are
//! [`PeriodicTask`]s sharing one cancellation token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use busylight_common::time::{Clock, PeriodicTask};
use busylight_domain::{DisplayState, Result, TickerConfig};
use chrono::{DateTime, DurationRound, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::error::TickerError;
use crate::consolidator::IntervalConsolidator;
use crate::ports::{CalendarSource, DisplayHandler};

/// Drives the refresh and tick cadences until stopped.
///
/// An orchestrator is single-use: once `start` has been called, later calls
/// return [`TickerError::AlreadyRunning`].
pub struct TickOrchestrator {
    calendar: Arc<dyn CalendarSource>,
    consolidator: Arc<IntervalConsolidator>,
    config: TickerConfig,
    clock: Arc<dyn Clock>,
    cancel: CancellationToken,
    done: CancellationToken,
    started: AtomicBool,
}

impl TickOrchestrator {
    pub fn new(
        calendar: Arc<dyn CalendarSource>,
        config: TickerConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let consolidator = Arc::new(IntervalConsolidator::new(config.jitter(), Arc::clone(&clock)));

        Self {
            calendar,
            consolidator,
            config,
            clock,
            cancel: CancellationToken::new(),
            done: CancellationToken::new(),
            started: AtomicBool::new(false),
        }
    }

    /// Shared consolidator, for diagnostics.
    pub fn consolidator(&self) -> Arc<IntervalConsolidator> {
        Arc::clone(&self.consolidator)
    }

    pub fn is_running(&self) -> bool {
        self.started.load(Ordering::SeqCst) && !self.done.is_cancelled()
    }

    /// Run one refresh and one tick, then both runners until [`stop`].
    ///
    /// Returns `Ok(())` after cancellation once in-flight runs finished.
    ///
    /// # Errors
    ///
    /// - [`TickerError::InitialRefresh`] / [`TickerError::InitialTick`] when
    ///   the synchronous first cycle fails
    /// - [`TickerError::AlreadyRunning`] on a second call
    ///
    /// [`stop`]: Self::stop
    #[instrument(skip_all)]
    pub async fn start(
        &self,
        handler: Arc<dyn DisplayHandler>,
    ) -> std::result::Result<(), TickerError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(TickerError::AlreadyRunning);
        }
        // Raised on every return path, including the error ones.
        let _done = self.done.clone().drop_guard();

        let limit = self.config.preview_limit();
        refresh(self.calendar.as_ref(), &self.consolidator, limit)
            .await
            .map_err(TickerError::InitialRefresh)?;
        tick(&self.consolidator, self.clock.as_ref(), handler.as_ref())
            .await
            .map_err(TickerError::InitialTick)?;

        info!(
            fetch_interval_secs = self.config.fetch_interval_secs,
            tick_interval_secs = self.config.tick_interval_secs,
            jitter_secs = self.config.jitter_secs,
            "tick orchestrator started"
        );

        let fetch = {
            let calendar = Arc::clone(&self.calendar);
            let consolidator = Arc::clone(&self.consolidator);
            PeriodicTask::new(
                "fetch",
                self.config.fetch_interval(),
                Arc::clone(&self.clock),
                move || {
                    let calendar = Arc::clone(&calendar);
                    let consolidator = Arc::clone(&consolidator);
                    async move { refresh(calendar.as_ref(), &consolidator, limit).await }
                },
            )
            .start(self.cancel.clone())
        };

        let ticker = {
            let consolidator = Arc::clone(&self.consolidator);
            let clock = Arc::clone(&self.clock);
            PeriodicTask::new(
                "tick",
                self.config.tick_interval(),
                Arc::clone(&self.clock),
                move || {
                    let consolidator = Arc::clone(&consolidator);
                    let clock = Arc::clone(&clock);
                    let handler = Arc::clone(&handler);
                    async move { tick(&consolidator, clock.as_ref(), handler.as_ref()).await }
                },
            )
            .start(self.cancel.clone())
        };

        self.cancel.cancelled().await;
        debug!("cancellation observed, waiting for runners");

        for (name, handle) in [("fetch", fetch), ("tick", ticker)] {
            if let Err(e) = handle.await {
                warn!(runner = name, error = %e, "runner terminated abnormally");
            }
        }

        info!("tick orchestrator stopped");
        Ok(())
    }

    /// Request shutdown and wait for `start` to return, at most `deadline`.
    ///
    /// Returns immediately when `start` was never called. Safe to call more
    /// than once.
    #[instrument(skip(self))]
    pub async fn stop(&self, deadline: Duration) {
        self.cancel.cancel();

        if !self.started.load(Ordering::SeqCst) {
            return;
        }

        if tokio::time::timeout(deadline, self.done.cancelled()).await.is_err() {
            warn!(deadline_ms = deadline.as_millis(), "tick orchestrator did not stop in time");
        }
    }
}

async fn refresh(
    calendar: &dyn CalendarSource,
    consolidator: &IntervalConsolidator,
    limit: chrono::Duration,
) -> Result<()> {
    let events = calendar.fetch(limit).await?;
    info!(count = events.len(), "got calendar events");
    consolidator.replace_events(events);
    Ok(())
}

async fn tick(
    consolidator: &IntervalConsolidator,
    clock: &dyn Clock,
    handler: &dyn DisplayHandler,
) -> Result<()> {
    let state = current_display_state(consolidator, clock);
    debug!(phase = %state.phase(), "emitting display state");
    handler.handle(state).await
}

/// Display state of the consolidated span, seen at the current whole minute.
pub fn current_display_state(consolidator: &IntervalConsolidator, clock: &dyn Clock) -> DisplayState {
    let interval = consolidator.current_interval();
    DisplayState::from_interval(interval.as_ref(), truncate_to_minute(clock.now()))
}

fn truncate_to_minute(now: DateTime<Utc>) -> DateTime<Utc> {
    now.duration_trunc(chrono::Duration::minutes(1)).unwrap_or(now)
}
