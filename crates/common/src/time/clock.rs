//! Wall-clock abstraction for testability
//!
//! Everything that reasons about "now" takes an `Arc<dyn Clock>` so tests can
//! pin time instead of racing the system clock.
//!
//! # Examples
//!
//! ```
//! use busylight_common::time::{Clock, MockClock, SystemClock};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! // Use system clock in production
//! let now = SystemClock.now();
//! assert!(now.timestamp() > 0);
//!
//! // Use mock clock in tests
//! let mock = MockClock::new(Utc.timestamp_opt(0, 0).unwrap());
//! mock.advance(Duration::seconds(5));
//! assert_eq!(mock.now().timestamp(), 5);
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

/// Source of the current wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Settable clock for deterministic tests
///
/// Clones share the same instant, so a clock handed to the code under test can
/// be moved forward from the test body.
#[derive(Debug, Clone)]
pub struct MockClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(at)) }
    }

    /// Jump to an absolute instant (backwards jumps are allowed).
    pub fn set(&self, at: DateTime<Utc>) {
        *self.now.lock() = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new(DateTime::<Utc>::default())
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}
