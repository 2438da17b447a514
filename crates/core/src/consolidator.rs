//! Interval consolidation
//!
//! Keeps the most recently fetched event set and reduces it, on demand, to the
//! single span the display should talk about. Expired events are trimmed from
//! the front of the set as a side effect of every read.

use std::sync::Arc;

use busylight_common::time::Clock;
use busylight_domain::{CalendarEvent, WorkingInterval};
use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use tracing::trace;

/// Owner of the current event set.
///
/// Reads and writes are serialized by one lock: reads mutate the set by
/// trimming, so there is no shared read mode.
pub struct IntervalConsolidator {
    events: Mutex<Vec<CalendarEvent>>,
    jitter: Duration,
    clock: Arc<dyn Clock>,
}

impl IntervalConsolidator {
    pub fn new(jitter: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { events: Mutex::new(Vec::new()), jitter, clock }
    }

    pub const fn jitter(&self) -> Duration {
        self.jitter
    }

    /// Replace the whole event set. An empty batch clears it.
    ///
    /// The batch is expected to be sorted ascending by start; this is not
    /// checked.
    pub fn replace_events(&self, events: Vec<CalendarEvent>) {
        *self.events.lock() = events;
    }

    /// Consolidated span as of the injected clock's current time.
    pub fn current_interval(&self) -> Option<WorkingInterval> {
        self.current_interval_at(self.clock.now())
    }

    /// Consolidated span as of `now`.
    ///
    /// Drops the expired prefix permanently, seeds the span from the first
    /// remaining event and walks forward:
    /// - an event strictly inside the span is absorbed,
    /// - otherwise an event starting before `span.end + jitter` extends it,
    /// - otherwise the walk stops.
    ///
    /// Returns `None` when no event is left.
    pub fn current_interval_at(&self, now: DateTime<Utc>) -> Option<WorkingInterval> {
        let mut events = self.events.lock();

        let expired = events.iter().take_while(|event| event.is_expired(now)).count();
        if expired > 0 {
            events.drain(..expired);
            trace!(expired, remaining = events.len(), "trimmed expired events");
        }

        let (first, rest) = events.split_first()?;
        let mut span = WorkingInterval::from(first);

        for event in rest {
            if span.start < event.start && span.end > event.end {
                continue;
            }

            if span.end + self.jitter > event.start {
                // Takes the candidate's end as is, even when it is earlier.
                span.end = event.end;
                continue;
            }

            break;
        }

        Some(span)
    }

    /// Copy of the retained (not yet trimmed) events.
    pub fn events(&self) -> Vec<CalendarEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}
