//! Integration tests for `TickOrchestrator`.
//!
//! Time is paused: the wall clock follows tokio's clock, so each test can
//! walk through several fetch/tick boundaries without real waiting.

mod support;

use std::sync::Arc;
use std::time::Duration;

use busylight_core::{TickOrchestrator, TickerError};
use busylight_domain::{BusylightError, DisplayPhase, TickerConfig};
use support::calendar::MockCalendar;
use support::clock::TokioClock;
use support::display::RecordingHandler;
use support::{event, origin};
use tokio::time::Instant;

fn config(fetch_secs: u64, tick_secs: u64) -> TickerConfig {
    TickerConfig {
        jitter_secs: 0,
        preview_limit_secs: 6 * 3_600,
        fetch_interval_secs: fetch_secs,
        tick_interval_secs: tick_secs,
    }
}

fn orchestrator(calendar: Arc<MockCalendar>, config: TickerConfig) -> Arc<TickOrchestrator> {
    Arc::new(TickOrchestrator::new(calendar, config, TokioClock::at(origin())))
}

#[tokio::test(start_paused = true)]
async fn test_initial_refresh_failure_is_fatal() {
    let calendar = Arc::new(MockCalendar::failing());
    let handler = Arc::new(RecordingHandler::new());
    let orch = orchestrator(Arc::clone(&calendar), config(3_600, 300));

    let err = orch.start(handler.clone()).await.unwrap_err();

    assert!(matches!(err, TickerError::InitialRefresh(BusylightError::Calendar(_))));
    assert!(handler.states().is_empty());
    assert!(!orch.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_initial_tick_failure_is_fatal() {
    let calendar = Arc::new(MockCalendar::new(vec![event(1, 20, 30)]));
    let handler = Arc::new(RecordingHandler::failing());
    let orch = orchestrator(Arc::clone(&calendar), config(3_600, 300));

    let err = orch.start(handler.clone()).await.unwrap_err();

    assert!(matches!(err, TickerError::InitialTick(BusylightError::Display(_))));
    assert_eq!(handler.states().len(), 1);
    assert_eq!(calendar.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_initial_cycle_then_ticks_on_boundaries() {
    let calendar = Arc::new(MockCalendar::new(vec![event(1, 20, 30), event(2, 40, 50)]));
    let handler = Arc::new(RecordingHandler::new());
    let orch = orchestrator(Arc::clone(&calendar), config(3_600, 300));

    let running = {
        let orch = Arc::clone(&orch);
        let handler = handler.clone();
        tokio::spawn(async move { orch.start(handler).await })
    };

    // 09:00:30 -> 09:11:30: initial tick plus the 09:05 and 09:10 boundaries.
    tokio::time::sleep(Duration::from_secs(11 * 60)).await;
    assert!(orch.is_running());

    orch.stop(Duration::from_secs(5)).await;
    running.await.unwrap().unwrap();

    let states = handler.states();
    let to_start: Vec<i64> = states.iter().map(|s| s.time_to_start.num_minutes()).collect();
    assert_eq!(to_start, vec![20, 15, 10]);
    assert!(states.iter().all(|s| s.phase() == DisplayPhase::Upcoming));
    assert_eq!(states[0].time_remaining, chrono::Duration::minutes(30));

    assert_eq!(calendar.calls(), 1);
    assert_eq!(calendar.limits(), vec![chrono::Duration::hours(6)]);
    assert!(!orch.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_state_moves_from_upcoming_to_on_air_to_free() {
    let calendar = Arc::new(MockCalendar::new(vec![event(1, 2, 4)]));
    let handler = Arc::new(RecordingHandler::new());
    let orch = orchestrator(Arc::clone(&calendar), config(3_600, 60));

    let running = {
        let orch = Arc::clone(&orch);
        let handler = handler.clone();
        tokio::spawn(async move { orch.start(handler).await })
    };

    // Ticks at 09:00 (initial), 09:01, 09:02, 09:03, 09:04, 09:05.
    tokio::time::sleep(Duration::from_secs(5 * 60)).await;
    orch.stop(Duration::from_secs(5)).await;
    running.await.unwrap().unwrap();

    let phases: Vec<DisplayPhase> = handler.states().iter().map(|s| s.phase()).collect();
    assert_eq!(
        phases,
        vec![
            DisplayPhase::Upcoming,
            DisplayPhase::Upcoming,
            DisplayPhase::OnAir,
            DisplayPhase::OnAir,
            DisplayPhase::Free,
            DisplayPhase::Free,
        ]
    );
    assert!(orch.consolidator().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_background_refresh_failures_keep_last_events() {
    let calendar = Arc::new(MockCalendar::failing_after(1, vec![event(1, -5, 120)]));
    let handler = Arc::new(RecordingHandler::new());
    let orch = orchestrator(Arc::clone(&calendar), config(60, 60));

    let running = {
        let orch = Arc::clone(&orch);
        let handler = handler.clone();
        tokio::spawn(async move { orch.start(handler).await })
    };

    tokio::time::sleep(Duration::from_secs(5 * 60)).await;
    orch.stop(Duration::from_secs(5)).await;
    running.await.unwrap().unwrap();

    // One successful initial fetch plus five failed background fetches.
    assert_eq!(calendar.calls(), 6);
    let states = handler.states();
    assert_eq!(states.len(), 6);
    assert!(states.iter().all(|s| s.phase() == DisplayPhase::OnAir));
}

#[tokio::test(start_paused = true)]
async fn test_background_tick_failures_keep_ticking() {
    let calendar = Arc::new(MockCalendar::new(vec![event(1, 20, 30)]));
    let handler = Arc::new(RecordingHandler::failing_after(1));
    let orch = orchestrator(Arc::clone(&calendar), config(3_600, 60));

    let running = {
        let orch = Arc::clone(&orch);
        let handler = handler.clone();
        tokio::spawn(async move { orch.start(handler).await })
    };

    // Initial tick succeeds, the 09:01 .. 09:04 ticks all fail.
    tokio::time::sleep(Duration::from_secs(4 * 60)).await;
    assert!(orch.is_running());

    orch.stop(Duration::from_secs(5)).await;
    running.await.unwrap().unwrap();

    let to_start: Vec<i64> =
        handler.states().iter().map(|s| s.time_to_start.num_minutes()).collect();
    assert_eq!(to_start, vec![20, 19, 18, 17, 16]);
    assert_eq!(handler.completed(), 5);
    assert_eq!(calendar.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_background_refresh_replaces_events() {
    let calendar = Arc::new(MockCalendar::new(Vec::new()));
    let handler = Arc::new(RecordingHandler::new());
    let orch = orchestrator(Arc::clone(&calendar), config(600, 300));

    let running = {
        let orch = Arc::clone(&orch);
        let handler = handler.clone();
        tokio::spawn(async move { orch.start(handler).await })
    };

    tokio::time::sleep(Duration::from_secs(60)).await;
    calendar.set_events(vec![event(7, 30, 45)]);

    // Fetch at 09:10 picks the event up, tick at 09:15 shows it.
    tokio::time::sleep(Duration::from_secs(15 * 60)).await;
    orch.stop(Duration::from_secs(5)).await;
    running.await.unwrap().unwrap();

    let states = handler.states();
    assert!(states[0].is_none);
    let last = states.last().unwrap();
    assert_eq!(last.phase(), DisplayPhase::Upcoming);
    assert_eq!(last.time_to_start, chrono::Duration::minutes(15));
}

#[tokio::test(start_paused = true)]
async fn test_second_start_is_rejected() {
    let calendar = Arc::new(MockCalendar::new(vec![event(1, 20, 30)]));
    let handler = Arc::new(RecordingHandler::new());
    let orch = orchestrator(Arc::clone(&calendar), config(3_600, 300));

    let running = {
        let orch = Arc::clone(&orch);
        let handler = handler.clone();
        tokio::spawn(async move { orch.start(handler).await })
    };
    tokio::time::sleep(Duration::from_secs(1)).await;

    let err = orch.start(handler.clone()).await.unwrap_err();
    assert!(matches!(err, TickerError::AlreadyRunning));

    orch.stop(Duration::from_secs(5)).await;
    running.await.unwrap().unwrap();
    assert_eq!(calendar.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_without_start_returns_immediately() {
    let orch = orchestrator(Arc::new(MockCalendar::new(Vec::new())), config(3_600, 300));
    let before = Instant::now();

    orch.stop(Duration::from_secs(60)).await;
    orch.stop(Duration::from_secs(60)).await;

    assert_eq!(before.elapsed(), Duration::ZERO);
    assert!(!orch.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_stop_is_bounded_by_deadline_while_run_finishes() {
    let calendar = Arc::new(MockCalendar::new(vec![event(1, 20, 30)]));
    // The 09:05 tick takes ten minutes.
    let handler = Arc::new(RecordingHandler::slow_from(1, Duration::from_secs(600)));
    let orch = orchestrator(Arc::clone(&calendar), config(3_600, 300));

    let running = {
        let orch = Arc::clone(&orch);
        let handler = handler.clone();
        tokio::spawn(async move { orch.start(handler).await })
    };

    tokio::time::sleep(Duration::from_secs(5 * 60)).await;
    assert_eq!(handler.states().len(), 2);
    assert_eq!(handler.completed(), 1);

    let before = Instant::now();
    orch.stop(Duration::from_secs(1)).await;
    let waited = before.elapsed();
    assert!(waited >= Duration::from_secs(1) && waited < Duration::from_secs(60), "{waited:?}");

    // The in-flight tick is not interrupted and no further tick starts.
    running.await.unwrap().unwrap();
    assert_eq!(handler.completed(), 2);
    assert_eq!(handler.states().len(), 2);
}
