//! Application context - dependency injection container

use std::path::PathBuf;
use std::sync::Arc;

use busylight_common::time::{Clock, SystemClock};
use busylight_core::{CalendarSource, TickOrchestrator};
use busylight_domain::{Config, Result};
use busylight_infra::{config, AwtrixPublisher, IcsCalendar};
use tracing::info;

/// Validated configuration plus the shared wall clock.
///
/// Adapters are built on demand so that commands which never talk to the
/// display do not need an endpoint.
pub struct AppContext {
    pub config: Config,
    pub clock: Arc<dyn Clock>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        Self { config, clock: Arc::new(SystemClock) }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Load and validate configuration from `path` or the standard locations.
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config = config::load(path)?;
        Ok(Self::new(config))
    }

    pub fn calendar(&self) -> Result<Arc<IcsCalendar>> {
        let calendar =
            IcsCalendar::from_config(&self.config.calendar)?.with_clock(Arc::clone(&self.clock));
        info!(url = %calendar.source_url(), timezone = %calendar.timezone(), "calendar source ready");
        Ok(Arc::new(calendar))
    }

    pub fn publisher(&self) -> Result<Arc<AwtrixPublisher>> {
        let publisher = AwtrixPublisher::new(self.config.display.clone())?;
        info!(url = %publisher.url(), "display publisher ready");
        Ok(Arc::new(publisher))
    }

    pub fn orchestrator(&self, calendar: Arc<dyn CalendarSource>) -> TickOrchestrator {
        TickOrchestrator::new(calendar, self.config.ticker, Arc::clone(&self.clock))
    }
}
