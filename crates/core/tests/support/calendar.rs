use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use busylight_core::CalendarSource;
use busylight_domain::{BusylightError, CalendarEvent, Result as DomainResult};
use parking_lot::Mutex;

/// In-memory `CalendarSource` serving a fixed event set.
///
/// Calls past `successes` fail with a calendar error, which lets tests cover
/// both the fatal first refresh and recoverable background refreshes.
pub struct MockCalendar {
    events: Mutex<Vec<CalendarEvent>>,
    successes: usize,
    calls: AtomicUsize,
    limits: Mutex<Vec<chrono::Duration>>,
}

impl MockCalendar {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self::failing_after(usize::MAX, events)
    }

    pub fn failing() -> Self {
        Self::failing_after(0, Vec::new())
    }

    pub fn failing_after(successes: usize, events: Vec<CalendarEvent>) -> Self {
        Self {
            events: Mutex::new(events),
            successes,
            calls: AtomicUsize::new(0),
            limits: Mutex::new(Vec::new()),
        }
    }

    pub fn set_events(&self, events: Vec<CalendarEvent>) {
        *self.events.lock() = events;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn limits(&self) -> Vec<chrono::Duration> {
        self.limits.lock().clone()
    }
}

#[async_trait]
impl CalendarSource for MockCalendar {
    async fn fetch(&self, limit: chrono::Duration) -> DomainResult<Vec<CalendarEvent>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.limits.lock().push(limit);

        if call >= self.successes {
            return Err(BusylightError::Calendar("feed unavailable".to_string()));
        }
        Ok(self.events.lock().clone())
    }
}
