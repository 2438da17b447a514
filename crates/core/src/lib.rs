//! # Busylight Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the calendar source and the display handler
//! - The interval consolidator that reduces an event set to one span
//! - The tick orchestrator driving the refresh and tick cadences
//!
//! ## Architecture Principles
//! - Only depends on `busylight-common` and `busylight-domain`
//! - No HTTP, parsing or device code
//! - All external collaborators via traits

pub mod consolidator;
pub mod ports;
pub mod ticker;

pub use consolidator::IntervalConsolidator;
pub use ports::{CalendarSource, DisplayHandler};
pub use ticker::{current_display_state, TickOrchestrator, TickerError};
