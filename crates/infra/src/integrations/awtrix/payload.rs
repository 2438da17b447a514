//! Awtrix custom-app payload and display-state rendering

use busylight_domain::{DisplayConfig, DisplayPhase, DisplayState, MessageStyle};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Placeholder shown when there is no time worth displaying.
pub const NO_TIME: &str = "##:##";

/// Body of `POST /api/custom`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwtrixPayload {
    pub text: String,
    pub color: String,
    pub icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<u64>,
}

impl AwtrixPayload {
    fn styled(text: String, style: &MessageStyle) -> Self {
        Self {
            text,
            color: style.color.clone(),
            icon: style.icon.clone(),
            lifetime: style.lifetime_secs,
        }
    }
}

/// Render `state` with the styles and upcoming limit of `config`.
///
/// Upcoming spans further away than the limit render like "free".
pub fn render(state: &DisplayState, config: &DisplayConfig) -> AwtrixPayload {
    let messages = &config.messages;

    match state.phase() {
        DisplayPhase::Upcoming if state.time_to_start <= config.upcoming_limit() => {
            AwtrixPayload::styled(format!("-{}", format_clock(state.time_to_start)), &messages.upcoming)
        }
        DisplayPhase::OnAir => {
            AwtrixPayload::styled(format!(" {}", format_clock(state.time_remaining)), &messages.on_air)
        }
        DisplayPhase::Free | DisplayPhase::Upcoming => {
            AwtrixPayload::styled(format!(" {NO_TIME}"), &messages.none)
        }
    }
}

/// `00:MM` under an hour, `HH:MM` under a day, [`NO_TIME`] beyond.
///
/// Negative durations render as zero.
pub fn format_clock(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);

    if minutes < 60 {
        format!("00:{minutes:02}")
    } else if minutes < 24 * 60 {
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    } else {
        NO_TIME.to_string()
    }
}
