//! HTTP client shared by the calendar source and the display publisher.

mod client;

pub use client::{HttpClient, HttpClientBuilder, RetryPolicy};
