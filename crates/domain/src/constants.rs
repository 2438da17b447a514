//! Application constants
//!
//! Centralized location for all domain-level defaults used throughout the
//! application.

// Ticker defaults
pub const DEFAULT_JITTER_SECS: u64 = 20 * 60;
pub const DEFAULT_PREVIEW_LIMIT_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_FETCH_INTERVAL_SECS: u64 = 60 * 60;
pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 5 * 60;

// Calendar defaults
pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const UNTITLED_EVENT_SUMMARY: &str = "n/a";

// Display defaults
pub const DEFAULT_APP_NAME: &str = "busylight";
pub const DEFAULT_UPCOMING_LIMIT_SECS: u64 = 60 * 60;
pub const DEFAULT_DISPLAY_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_ICON: &str = "11899";
pub const DEFAULT_COLOR: &str = "#FFFFFF";
pub const ON_AIR_COLOR: &str = "#E60000";

// Shutdown
pub const SHUTDOWN_DEADLINE_SECS: u64 = 5 * 60;
