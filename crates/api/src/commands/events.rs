//! `busylight events`: fetch and print upcoming events.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use busylight_core::CalendarSource;
use busylight_domain::CalendarEvent;
use chrono_tz::Tz;

use crate::context::AppContext;

const TIME_FORMAT: &str = "%d %b %y %H:%M %Z";

pub async fn run(ctx: &AppContext, limit: Duration) -> anyhow::Result<()> {
    let lines = fetch_lines(ctx, limit).await?;

    let mut out = std::io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// One formatted line per event inside `limit`, in calendar time zone.
pub async fn fetch_lines(ctx: &AppContext, limit: Duration) -> anyhow::Result<Vec<String>> {
    let limit = chrono::Duration::from_std(limit).context("event limit out of range")?;
    let calendar = ctx.calendar().context("create calendar")?;
    let events = calendar.fetch(limit).await.context("fetch events")?;

    Ok(events.iter().map(|event| format_event(event, calendar.timezone())).collect())
}

/// `[start <--> end] summary`
pub fn format_event(event: &CalendarEvent, zone: Tz) -> String {
    format!(
        "[{} <--> {}] {}",
        event.start.with_timezone(&zone).format(TIME_FORMAT),
        event.end.with_timezone(&zone).format(TIME_FORMAT),
        event.summary
    )
}
