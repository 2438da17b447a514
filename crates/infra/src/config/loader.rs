//! Configuration loader
//!
//! Builds the application [`Config`] from an optional file plus environment
//! overrides.
//!
//! ## Loading Strategy
//! 1. Use the explicit path when one is given (it must exist)
//! 2. Otherwise probe the standard locations; fall back to defaults
//! 3. Apply `BUSYLIGHT_*` environment overrides
//! 4. Validate the result
//!
//! ## Environment Variables
//! - `BUSYLIGHT_CALENDAR_URL`: iCalendar feed address
//! - `BUSYLIGHT_CALENDAR_TIMEZONE`: zone for floating and all-day times
//! - `BUSYLIGHT_JITTER_SECS`: merge tolerance between events
//! - `BUSYLIGHT_PREVIEW_LIMIT_SECS`: calendar look-ahead window
//! - `BUSYLIGHT_FETCH_INTERVAL_SECS`: calendar refresh cadence
//! - `BUSYLIGHT_TICK_INTERVAL_SECS`: display update cadence
//! - `BUSYLIGHT_DISPLAY_ENDPOINT`: Awtrix base URL
//! - `BUSYLIGHT_DISPLAY_APP_NAME`: Awtrix custom app name
//! - `BUSYLIGHT_UPCOMING_LIMIT_SECS`: how early an upcoming span is shown
//! - `BUSYLIGHT_VERBOSE`, `BUSYLIGHT_LOG_JSON`: logging switches (true/false)
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./busylight.toml`, `./busylight.json`, `./config.toml`, `./config.json`
//! 2. The same names one and two directories up
//! 3. The same names next to the executable

use std::path::{Path, PathBuf};

use busylight_domain::{BusylightError, Config, Result};

use crate::errors::InfraError;

const FILE_NAMES: [&str; 4] = ["busylight.toml", "busylight.json", "config.toml", "config.json"];

/// Load, override and validate the configuration.
///
/// # Errors
/// Returns `BusylightError::Config` if:
/// - The explicit file does not exist or cannot be parsed
/// - An environment override holds an invalid value
/// - The resulting configuration fails validation
pub fn load(path: Option<PathBuf>) -> Result<Config> {
    let mut config = match path {
        Some(path) => load_from_file(&path)?,
        None => match probe_config_paths() {
            Some(found) => load_from_file(&found)?,
            None => {
                tracing::info!("No config file found, using defaults");
                Config::default()
            }
        },
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a file without overrides or validation.
///
/// Format is detected by extension (`.toml` or `.json`).
///
/// # Errors
/// Returns `BusylightError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Err(BusylightError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path).map_err(InfraError::from)?;
    parse_config(&contents, path)
}

fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("toml");

    match extension {
        "toml" => Ok(toml::from_str(contents).map_err(InfraError::from)?),
        "json" => Ok(serde_json::from_str(contents).map_err(InfraError::from)?),
        _ => Err(BusylightError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// First existing config file among the standard locations.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend([cwd.clone(), cwd.join(".."), cwd.join("../..")]);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    dirs.iter()
        .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.exists())
}

/// Overlay `BUSYLIGHT_*` variables onto `config`.
///
/// # Errors
/// Returns `BusylightError::Config` when a numeric variable does not parse.
pub fn apply_env_overrides(config: &mut Config) -> Result<()> {
    if let Some(url) = env_var("BUSYLIGHT_CALENDAR_URL") {
        config.calendar.source_url = url;
    }
    if let Some(tz) = env_var("BUSYLIGHT_CALENDAR_TIMEZONE") {
        config.calendar.timezone = tz;
    }

    if let Some(secs) = env_u64("BUSYLIGHT_JITTER_SECS")? {
        config.ticker.jitter_secs = secs;
    }
    if let Some(secs) = env_u64("BUSYLIGHT_PREVIEW_LIMIT_SECS")? {
        config.ticker.preview_limit_secs = secs;
    }
    if let Some(secs) = env_u64("BUSYLIGHT_FETCH_INTERVAL_SECS")? {
        config.ticker.fetch_interval_secs = secs;
    }
    if let Some(secs) = env_u64("BUSYLIGHT_TICK_INTERVAL_SECS")? {
        config.ticker.tick_interval_secs = secs;
    }

    if let Some(endpoint) = env_var("BUSYLIGHT_DISPLAY_ENDPOINT") {
        config.display.endpoint = endpoint;
    }
    if let Some(app_name) = env_var("BUSYLIGHT_DISPLAY_APP_NAME") {
        config.display.app_name = app_name;
    }
    if let Some(secs) = env_u64("BUSYLIGHT_UPCOMING_LIMIT_SECS")? {
        config.display.upcoming_limit_secs = secs;
    }

    config.verbose = env_bool("BUSYLIGHT_VERBOSE", config.verbose);
    config.log_json = env_bool("BUSYLIGHT_LOG_JSON", config.log_json);

    Ok(())
}

/// Non-empty environment variable.
fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    env_var(key)
        .map(|raw| {
            raw.parse::<u64>()
                .map_err(|e| BusylightError::Config(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
