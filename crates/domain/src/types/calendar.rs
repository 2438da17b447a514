//! Calendar event and consolidated interval types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::display::DisplayState;

/// A single calendar event as reported by a calendar source.
///
/// Batches are expected to arrive sorted ascending by `start` and free of
/// exact duplicates; events may still overlap or touch each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Stable identity derived by the source. `0` means "no identity".
    pub id: u64,
    pub summary: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CalendarEvent {
    pub fn new(
        id: u64,
        summary: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self { id, summary: summary.into(), start, end }
    }

    /// Whether both values describe the same calendar entry.
    ///
    /// Identities win when both sides carry one; otherwise the summary and
    /// both boundaries must match.
    pub fn is_same(&self, other: &Self) -> bool {
        if self.id != 0 && other.id != 0 {
            return self.id == other.id;
        }

        self.summary == other.summary && self.start == other.start && self.end == other.end
    }

    /// An event stops being relevant once `now` reaches its end.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.end
    }
}

/// The single consolidated span currently treated as "the meeting".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WorkingInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Derive the display state of this span as seen at `now`.
    pub fn to_display_state(&self, now: DateTime<Utc>) -> DisplayState {
        DisplayState {
            is_none: false,
            upcoming: self.start > now,
            time_to_start: self.start - now,
            time_remaining: self.end - now,
            starts_at: Some(self.start),
            ends_at: Some(self.end),
        }
    }
}

impl From<&CalendarEvent> for WorkingInterval {
    fn from(event: &CalendarEvent) -> Self {
        Self { start: event.start, end: event.end }
    }
}

impl std::fmt::Display for WorkingInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.start.to_rfc3339(), self.end.to_rfc3339())
    }
}
