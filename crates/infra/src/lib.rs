//! # Busylight Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - Configuration loading (TOML/JSON files plus environment overrides)
//! - HTTP client with retry and backoff
//! - iCalendar feed source (implements `CalendarSource`)
//! - Awtrix display publisher (implements `DisplayHandler`)
//!
//! ## Architecture
//! - Implements traits defined in `busylight-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod config;
pub mod errors;
pub mod http;
pub mod integrations;

// Re-export commonly used items
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use integrations::awtrix::{AwtrixPayload, AwtrixPublisher};
pub use integrations::calendar::IcsCalendar;
