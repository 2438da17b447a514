//! Shared test helpers for `busylight-core` integration tests.
//!
//! Lightweight mocks for the calendar and display ports plus a wall clock
//! that follows tokio's pausable time, so orchestrator tests can run whole
//! hours of cadence instantly and deterministically.

#![allow(dead_code)]

pub mod calendar;
pub mod clock;
pub mod display;

use busylight_domain::CalendarEvent;
use chrono::{DateTime, Duration, TimeZone, Utc};

/// 09:00:30 UTC, deliberately off the minute grid.
pub fn origin() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 15, 9, 0, 30).unwrap()
}

/// Event spanning `[09:00 + start_min, 09:00 + end_min]`.
pub fn event(id: u64, start_min: i64, end_min: i64) -> CalendarEvent {
    let hour = Utc.with_ymd_and_hms(2024, 4, 15, 9, 0, 0).unwrap();
    CalendarEvent::new(
        id,
        format!("meeting {id}"),
        hour + Duration::minutes(start_min),
        hour + Duration::minutes(end_min),
    )
}
