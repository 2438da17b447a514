//! Common utilities shared across Busylight crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: wall-clock abstraction, duration parsing and formatting
//! - `runtime`: tokio-driven periodic tasks (enabled by default)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

#[cfg(feature = "foundation")]
pub mod time;

#[cfg(feature = "foundation")]
pub use time::{
    format_duration, parse_duration, Clock, DurationParseError, MockClock, SystemClock,
};
#[cfg(feature = "runtime")]
pub use time::{next_boundary, PeriodicTask, DEFAULT_TASK_INTERVAL};
