//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Busylight
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum BusylightError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Display error: {0}")]
    Display(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BusylightError {
    /// Stable label suitable for structured log fields.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Calendar(_) => "calendar",
            Self::Display(_) => "display",
            Self::Network(_) => "network",
            Self::InvalidInput(_) => "invalid_input",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Busylight operations
pub type Result<T> = std::result::Result<T, BusylightError>;
