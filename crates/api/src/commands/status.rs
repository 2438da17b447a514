//! `busylight status`: one refresh and consolidation, printed instead of
//! published.

use std::io::Write;

use anyhow::Context;
use busylight_common::time::format_signed_duration;
use busylight_core::{current_display_state, CalendarSource, IntervalConsolidator};
use busylight_domain::{DisplayState, WorkingInterval};
use busylight_infra::integrations::awtrix::{render, AwtrixPayload};
use serde::Serialize;

use crate::context::AppContext;

/// What `status` reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub interval: Option<WorkingInterval>,
    pub state: DisplayState,
    pub payload: AwtrixPayload,
}

pub async fn run(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let report = snapshot(ctx).await?;
    let mut out = std::io::stdout().lock();

    if json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "phase:          {}", report.state.phase())?;
    match report.interval {
        Some(interval) => writeln!(out, "span:           {interval}")?,
        None => writeln!(out, "span:           -")?,
    }
    if !report.state.is_none {
        writeln!(out, "time to start:  {}", format_signed_duration(report.state.time_to_start))?;
        writeln!(out, "time remaining: {}", format_signed_duration(report.state.time_remaining))?;
    }
    writeln!(out, "display text:   {:?}", report.payload.text)?;
    writeln!(out, "display color:  {}", report.payload.color)?;
    Ok(())
}

/// Fetch once, consolidate and render without touching the display.
pub async fn snapshot(ctx: &AppContext) -> anyhow::Result<StatusReport> {
    let ticker = &ctx.config.ticker;
    let calendar = ctx.calendar().context("create calendar")?;
    let events = calendar.fetch(ticker.preview_limit()).await.context("fetch events")?;

    let consolidator = IntervalConsolidator::new(ticker.jitter(), ctx.clock.clone());
    consolidator.replace_events(events);

    let interval = consolidator.current_interval();
    let state = current_display_state(&consolidator, ctx.clock.as_ref());
    let payload = render(&state, &ctx.config.display);

    Ok(StatusReport { interval, state, payload })
}
