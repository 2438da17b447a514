//! Tick orchestration
//!
//! Runs one synchronous refresh and tick, then the periodic phase until
//! cancelled. See [`TickOrchestrator`].

pub mod error;
pub mod orchestrator;

pub use error::TickerError;
pub use orchestrator::{current_display_state, TickOrchestrator};
