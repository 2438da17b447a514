//! Calendar integration
//!
//! Reads a published iCalendar feed over HTTP and turns its events into
//! domain [`CalendarEvent`](busylight_domain::CalendarEvent)s, expanding
//! recurring ones inside the requested window.

pub mod ics;
pub mod recurrence;
pub mod source;

pub use ics::IcsError;
pub use source::{collect_events, IcsCalendar};
