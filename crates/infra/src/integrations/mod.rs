//! External service integrations

pub mod awtrix;
pub mod calendar;
