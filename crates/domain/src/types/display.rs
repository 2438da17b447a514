//! Display state emitted on every tick

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::WorkingInterval;
use crate::impl_domain_label_conversions;

/// What the status display should show at a given instant.
///
/// Durations are signed: `time_to_start` turns negative once the span began.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub is_none: bool,
    pub upcoming: bool,
    #[serde(with = "signed_seconds")]
    pub time_to_start: Duration,
    #[serde(with = "signed_seconds")]
    pub time_remaining: Duration,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

impl DisplayState {
    /// State for "no relevant event".
    pub fn none() -> Self {
        Self {
            is_none: true,
            upcoming: true,
            time_to_start: Duration::zero(),
            time_remaining: Duration::zero(),
            starts_at: None,
            ends_at: None,
        }
    }

    pub fn from_interval(interval: Option<&WorkingInterval>, now: DateTime<Utc>) -> Self {
        interval.map_or_else(Self::none, |interval| interval.to_display_state(now))
    }

    pub fn phase(&self) -> DisplayPhase {
        if self.is_none {
            DisplayPhase::Free
        } else if self.upcoming {
            DisplayPhase::Upcoming
        } else {
            DisplayPhase::OnAir
        }
    }
}

impl Default for DisplayState {
    fn default() -> Self {
        Self::none()
    }
}

/// Coarse classification of a [`DisplayState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayPhase {
    Free,
    Upcoming,
    OnAir,
}

impl_domain_label_conversions!(DisplayPhase {
    Free => "free",
    Upcoming => "upcoming",
    OnAir => "on_air",
});

mod signed_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(duration.num_seconds())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seconds = i64::deserialize(deserializer)?;
        Ok(Duration::seconds(seconds))
    }
}
