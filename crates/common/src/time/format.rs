//! Human-readable duration formatting

use std::time::Duration;

/// Format a duration as space-separated components, largest unit first.
///
/// Leading zero components are dropped, trailing ones are kept so that the
/// output width stays stable (`1h 0m 0s`). Sub-second durations print as
/// `0s`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use busylight_common::time::format_duration;
///
/// assert_eq!(format_duration(Duration::from_secs(5)), "5s");
/// assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
/// assert_eq!(format_duration(Duration::from_secs(3665)), "1h 1m 5s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();

    let days = total_secs / 86_400;
    let hours = (total_secs % 86_400) / 3_600;
    let minutes = (total_secs % 3_600) / 60;
    let seconds = total_secs % 60;

    let components = [(days, "d"), (hours, "h"), (minutes, "m"), (seconds, "s")];
    let first = components.iter().position(|(value, _)| *value > 0).unwrap_or(components.len() - 1);

    components[first..]
        .iter()
        .map(|(value, suffix)| format!("{value}{suffix}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a signed chrono duration, prefixing negative values with `-`.
pub fn format_signed_duration(duration: chrono::Duration) -> String {
    let magnitude = duration.abs().to_std().unwrap_or_default();
    let formatted = format_duration(magnitude);
    if duration < chrono::Duration::zero() {
        format!("-{formatted}")
    } else {
        formatted
    }
}
