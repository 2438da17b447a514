//! Domain types and models

pub mod calendar;
pub mod display;

pub use calendar::{CalendarEvent, WorkingInterval};
pub use display::{DisplayPhase, DisplayState};
