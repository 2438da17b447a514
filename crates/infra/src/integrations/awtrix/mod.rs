//! Awtrix integration
//!
//! Shows the meeting countdown on an Awtrix pixel clock through its HTTP
//! custom-app API.

pub mod payload;
pub mod publisher;

pub use payload::{format_clock, render, AwtrixPayload};
pub use publisher::AwtrixPublisher;
