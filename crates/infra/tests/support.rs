#![allow(dead_code)]

use std::time::Duration;

use busylight_infra::HttpClient;
use chrono::{DateTime, TimeZone, Utc};

/// 2024-04-15 09:00:00 UTC, the "now" of every feed fixture.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 15, 9, 0, 0).unwrap()
}

/// Client with millisecond backoff so retry tests stay fast.
pub fn fast_client(attempts: usize) -> HttpClient {
    HttpClient::builder()
        .base_backoff(Duration::from_millis(5))
        .max_attempts(attempts)
        .build()
        .expect("http client should build")
}

/// Minimal feed with one `VEVENT` per `(summary, dtstart, dtend)` triple.
pub fn feed(events: &[(&str, &str, &str)]) -> String {
    let mut body = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:-//busylight//tests//EN\r\n");
    for (summary, start, end) in events {
        body.push_str("BEGIN:VEVENT\r\n");
        body.push_str(&format!("SUMMARY:{summary}\r\nDTSTART:{start}\r\nDTEND:{end}\r\n"));
        body.push_str("END:VEVENT\r\n");
    }
    body.push_str("END:VCALENDAR\r\n");
    body
}
