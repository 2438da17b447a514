//! Tick orchestrator error types

use busylight_domain::BusylightError;
use thiserror::Error;

/// Errors returned by [`TickOrchestrator::start`](super::TickOrchestrator::start)
#[derive(Debug, Error)]
pub enum TickerError {
    /// The mandatory first refresh failed; the periodic phase was not entered
    #[error("initial refresh failed: {0}")]
    InitialRefresh(BusylightError),

    /// The mandatory first tick failed; the periodic phase was not entered
    #[error("initial tick failed: {0}")]
    InitialTick(BusylightError),

    /// `start` was already called on this orchestrator
    #[error("tick orchestrator already started")]
    AlreadyRunning,
}

impl From<TickerError> for BusylightError {
    fn from(err: TickerError) -> Self {
        match err {
            TickerError::InitialRefresh(inner) | TickerError::InitialTick(inner) => inner,
            TickerError::AlreadyRunning => Self::InvalidInput(err.to_string()),
        }
    }
}
