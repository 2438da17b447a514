//! Port interfaces for the ticker
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use busylight_domain::{CalendarEvent, DisplayState, Result};

/// Source of calendar events
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Events overlapping `[now, now + limit]`, sorted ascending by start and
    /// free of exact duplicates.
    async fn fetch(&self, limit: chrono::Duration) -> Result<Vec<CalendarEvent>>;
}

/// Consumer of the display state computed on every tick
#[async_trait]
pub trait DisplayHandler: Send + Sync {
    async fn handle(&self, state: DisplayState) -> Result<()>;
}
