use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use busylight_core::DisplayHandler;
use busylight_domain::{BusylightError, DisplayState, Result as DomainResult};
use parking_lot::Mutex;

/// `DisplayHandler` that records every state it receives.
#[derive(Default)]
pub struct RecordingHandler {
    states: Mutex<Vec<DisplayState>>,
    completed: AtomicUsize,
    /// Calls with an index >= `fail_from` return a display error.
    fail_from: Option<usize>,
    /// Calls with an index >= `slow_from` sleep for `delay` before returning.
    slow_from: Option<usize>,
    delay: Duration,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self::failing_after(0)
    }

    pub fn failing_after(successes: usize) -> Self {
        Self { fail_from: Some(successes), ..Self::default() }
    }

    pub fn slow_from(call: usize, delay: Duration) -> Self {
        Self { slow_from: Some(call), delay, ..Self::default() }
    }

    pub fn states(&self) -> Vec<DisplayState> {
        self.states.lock().clone()
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DisplayHandler for RecordingHandler {
    async fn handle(&self, state: DisplayState) -> DomainResult<()> {
        let call = {
            let mut states = self.states.lock();
            states.push(state);
            states.len() - 1
        };

        if self.slow_from.is_some_and(|from| call >= from) {
            tokio::time::sleep(self.delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);

        if self.fail_from.is_some_and(|from| call >= from) {
            return Err(BusylightError::Display("device offline".to_string()));
        }
        Ok(())
    }
}
