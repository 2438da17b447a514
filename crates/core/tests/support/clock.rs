use std::sync::Arc;

use busylight_common::time::Clock;
use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Wall clock anchored at `origin` and advanced by tokio's clock.
///
/// Combined with `#[tokio::test(start_paused = true)]`, sleeping in the test
/// body moves this clock forward by exactly the slept duration.
pub struct TokioClock {
    origin: DateTime<Utc>,
    started: Instant,
}

impl TokioClock {
    pub fn at(origin: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self { origin, started: Instant::now() })
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        self.origin + chrono::Duration::from_std(self.started.elapsed()).unwrap()
    }
}
