//! Configuration structures
//!
//! Every section deserializes with defaults so that a partial file (or none
//! at all) still yields a usable configuration. Loading and environment
//! overrides live in the infra crate.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_APP_NAME, DEFAULT_COLOR, DEFAULT_DISPLAY_TIMEOUT_SECS, DEFAULT_FETCH_INTERVAL_SECS,
    DEFAULT_ICON, DEFAULT_JITTER_SECS, DEFAULT_PREVIEW_LIMIT_SECS, DEFAULT_TICK_INTERVAL_SECS,
    DEFAULT_TIMEZONE, DEFAULT_UPCOMING_LIMIT_SECS, ON_AIR_COLOR,
};
use crate::{BusylightError, Result};

/// Longest window accepted for jitter and preview settings (one year).
pub const MAX_WINDOW_SECS: u64 = 366 * 24 * 60 * 60;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub verbose: bool,
    pub log_json: bool,
    pub calendar: CalendarConfig,
    pub ticker: TickerConfig,
    pub display: DisplayConfig,
}

impl Config {
    /// Validate settings shared by every command.
    ///
    /// The display endpoint is only required by `start` and is checked there
    /// through [`DisplayConfig::require_endpoint`].
    pub fn validate(&self) -> Result<()> {
        self.calendar.validate()?;
        self.ticker.validate()?;
        self.display.validate()
    }
}

/// Calendar feed configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Address of the iCalendar feed.
    pub source_url: String,
    /// IANA zone used for floating and all-day times.
    pub timezone: String,
}

impl CalendarConfig {
    pub fn validate(&self) -> Result<()> {
        if self.source_url.trim().is_empty() {
            return Err(BusylightError::Config("calendar.source_url must be set".to_string()));
        }
        if self.timezone.trim().is_empty() {
            return Err(BusylightError::Config("calendar.timezone must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self { source_url: String::new(), timezone: DEFAULT_TIMEZONE.to_string() }
    }
}

/// Tick orchestration settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerConfig {
    /// Gap tolerated between two events that still merge into one span.
    pub jitter_secs: u64,
    /// How far ahead the calendar is queried.
    pub preview_limit_secs: u64,
    pub fetch_interval_secs: u64,
    pub tick_interval_secs: u64,
}

impl TickerConfig {
    pub fn jitter(&self) -> chrono::Duration {
        signed_seconds(self.jitter_secs)
    }

    pub fn preview_limit(&self) -> chrono::Duration {
        signed_seconds(self.preview_limit_secs)
    }

    pub const fn fetch_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_interval_secs)
    }

    pub const fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.tick_interval_secs)
    }

    /// Reject zero intervals and windows beyond [`MAX_WINDOW_SECS`].
    pub fn validate(&self) -> Result<()> {
        if self.preview_limit_secs == 0 {
            return Err(BusylightError::Config("ticker.preview_limit_secs must be > 0".to_string()));
        }
        if self.fetch_interval_secs == 0 {
            return Err(BusylightError::Config(
                "ticker.fetch_interval_secs must be > 0".to_string(),
            ));
        }
        if self.tick_interval_secs == 0 {
            return Err(BusylightError::Config("ticker.tick_interval_secs must be > 0".to_string()));
        }
        if self.jitter_secs > MAX_WINDOW_SECS || self.preview_limit_secs > MAX_WINDOW_SECS {
            return Err(BusylightError::Config(format!(
                "ticker windows must not exceed {MAX_WINDOW_SECS}s"
            )));
        }
        Ok(())
    }
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            jitter_secs: DEFAULT_JITTER_SECS,
            preview_limit_secs: DEFAULT_PREVIEW_LIMIT_SECS,
            fetch_interval_secs: DEFAULT_FETCH_INTERVAL_SECS,
            tick_interval_secs: DEFAULT_TICK_INTERVAL_SECS,
        }
    }
}

/// Awtrix display configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Base URL of the Awtrix device, e.g. `http://192.168.1.20`.
    pub endpoint: String,
    pub app_name: String,
    /// Upcoming spans further away than this render as "free".
    pub upcoming_limit_secs: u64,
    pub timeout_secs: u64,
    pub messages: MessageSet,
}

impl DisplayConfig {
    pub fn upcoming_limit(&self) -> chrono::Duration {
        signed_seconds(self.upcoming_limit_secs)
    }

    pub const fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.app_name.trim().is_empty() {
            return Err(BusylightError::Config("display.app_name must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(BusylightError::Config("display.timeout_secs must be > 0".to_string()));
        }
        if self.upcoming_limit_secs > MAX_WINDOW_SECS {
            return Err(BusylightError::Config(format!(
                "display.upcoming_limit_secs must not exceed {MAX_WINDOW_SECS}s"
            )));
        }
        Ok(())
    }

    pub fn require_endpoint(&self) -> Result<&str> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(BusylightError::Config("display.endpoint must be set".to_string()));
        }
        Ok(endpoint)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            app_name: DEFAULT_APP_NAME.to_string(),
            upcoming_limit_secs: DEFAULT_UPCOMING_LIMIT_SECS,
            timeout_secs: DEFAULT_DISPLAY_TIMEOUT_SECS,
            messages: MessageSet::default(),
        }
    }
}

/// Styles for the three display phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSet {
    pub none: MessageStyle,
    pub upcoming: MessageStyle,
    pub on_air: MessageStyle,
}

impl Default for MessageSet {
    fn default() -> Self {
        Self {
            none: MessageStyle::default(),
            upcoming: MessageStyle::default(),
            on_air: MessageStyle { color: ON_AIR_COLOR.to_string(), ..MessageStyle::default() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageStyle {
    pub color: String,
    pub icon: String,
    /// Seconds the device keeps the app before dropping it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime_secs: Option<u64>,
}

impl Default for MessageStyle {
    fn default() -> Self {
        Self { color: DEFAULT_COLOR.to_string(), icon: DEFAULT_ICON.to_string(), lifetime_secs: None }
    }
}

fn signed_seconds(secs: u64) -> chrono::Duration {
    // Windows are capped by validation; clamp for unvalidated values.
    let secs = i64::try_from(secs.min(MAX_WINDOW_SECS)).unwrap_or(0);
    chrono::Duration::seconds(secs)
}
