//! `busylight start`: run the orchestrator until a shutdown signal.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use busylight_domain::constants::SHUTDOWN_DEADLINE_SECS;
use tracing::{info, warn};

use crate::context::AppContext;

pub async fn run(ctx: &AppContext) -> anyhow::Result<()> {
    let calendar = ctx.calendar().context("create calendar")?;
    let publisher = ctx.publisher().context("create display publisher")?;
    let orchestrator = Arc::new(ctx.orchestrator(calendar));

    let mut running = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.start(publisher).await })
    };

    tokio::select! {
        joined = &mut running => {
            // Only the initial cycle makes `start` return without a stop request.
            joined
                .context("orchestrator task panicked")?
                .context("failed to start application")?;
            return Ok(());
        }
        signal = shutdown_signal() => {
            info!(signal, "shutting down gracefully by signal");
        }
    }

    orchestrator.stop(Duration::from_secs(SHUTDOWN_DEADLINE_SECS)).await;

    if running.is_finished() {
        running
            .await
            .context("orchestrator task panicked")?
            .context("orchestrator failed")?;
    } else {
        warn!("in-flight run still active at shutdown deadline, abandoning it");
    }

    info!("stopped");
    Ok(())
}

/// Resolves with the name of the first shutdown signal received.
async fn shutdown_signal() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    () = ctrl_c() => "SIGINT",
                    _ = terminate.recv() => "SIGTERM",
                }
            }
            Err(err) => {
                warn!(error = %err, "cannot listen for SIGTERM");
                ctrl_c().await;
                "SIGINT"
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
        "ctrl-c"
    }
}

async fn ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "cannot listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
