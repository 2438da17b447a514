//! Time utilities and abstractions
//!
//! - **[`clock`]**: injectable wall clock (real and mock)
//! - **[`duration`]**: parsing of human duration strings
//! - **[`format`]**: human-readable duration formatting
//! - **[`periodic`]**: grid-aligned periodic task runner
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use busylight_common::time::{format_duration, parse_duration, Clock, MockClock};
//! use chrono::{TimeZone, Utc};
//!
//! assert_eq!(format_duration(Duration::from_secs(3665)), "1h 1m 5s");
//! assert_eq!(parse_duration("2h 30m").unwrap(), Duration::from_secs(9000));
//!
//! let clock = MockClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
//! clock.advance(chrono::Duration::minutes(5));
//! assert_eq!(clock.now(), Utc.with_ymd_and_hms(2024, 1, 1, 9, 5, 0).unwrap());
//! ```

pub mod clock;
pub mod duration;
pub mod format;
#[cfg(feature = "runtime")]
pub mod periodic;

// Re-export commonly used items
pub use clock::{Clock, MockClock, SystemClock};
pub use duration::{parse_duration, DurationParseError};
pub use format::{format_duration, format_signed_duration};
#[cfg(feature = "runtime")]
pub use periodic::{next_boundary, PeriodicTask, DEFAULT_TASK_INTERVAL};
