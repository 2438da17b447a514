//! Duration parsing from strings
//!
//! Accepts whole-number components with a unit suffix, optionally separated
//! by whitespace: `90s`, `10m`, `24h`, `1h 30m`, `2d12h`, `1w`.

use std::time::Duration;

use thiserror::Error;

/// Error type for duration parsing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationParseError {
    #[error("Invalid duration format: {0}")]
    InvalidFormat(String),

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Unknown unit: {0}")]
    UnknownUnit(String),

    #[error("Empty duration string")]
    EmptyString,
}

/// Parse a duration string into a [`Duration`]
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use busylight_common::time::parse_duration;
///
/// assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
/// assert_eq!(parse_duration("24h").unwrap(), Duration::from_secs(86_400));
/// assert_eq!(parse_duration("1h 30m").unwrap(), Duration::from_secs(5_400));
/// ```
pub fn parse_duration(s: &str) -> Result<Duration, DurationParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(DurationParseError::EmptyString);
    }

    let mut total_secs: u64 = 0;
    let mut digits = String::new();

    for ch in s.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        if ch.is_whitespace() {
            if !digits.is_empty() {
                return Err(DurationParseError::InvalidFormat(format!(
                    "Missing unit after {digits}"
                )));
            }
            continue;
        }

        if digits.is_empty() {
            return Err(DurationParseError::InvalidFormat(format!(
                "Expected number before unit '{ch}'"
            )));
        }

        let value: u64 =
            digits.parse().map_err(|_| DurationParseError::InvalidNumber(digits.clone()))?;
        let unit_secs = unit_seconds(ch)?;
        let component = value
            .checked_mul(unit_secs)
            .ok_or_else(|| DurationParseError::InvalidNumber(digits.clone()))?;
        total_secs = total_secs
            .checked_add(component)
            .ok_or_else(|| DurationParseError::InvalidNumber(s.to_string()))?;
        digits.clear();
    }

    if !digits.is_empty() {
        return Err(DurationParseError::InvalidFormat(format!("Missing unit after {digits}")));
    }

    Ok(Duration::from_secs(total_secs))
}

fn unit_seconds(unit: char) -> Result<u64, DurationParseError> {
    match unit {
        's' => Ok(1),
        'm' => Ok(60),
        'h' => Ok(3_600),
        'd' => Ok(86_400),
        'w' => Ok(604_800),
        other => Err(DurationParseError::UnknownUnit(other.to_string())),
    }
}
