//! # Busylight App
//!
//! Command line layer - argument parsing, wiring and the main entry point.
//!
//! This crate contains:
//! - The `busylight` CLI definition
//! - Application context (dependency injection)
//! - One module per command (`start`, `events`, `status`)
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

use std::time::Instant;

use anyhow::Context;
use busylight_domain::BusylightError;
use tracing::{debug, warn};

pub mod cli;
pub mod commands;
pub mod context;
pub mod utils;

pub use cli::{Cli, Command};
pub use context::AppContext;

use crate::utils::logging::{init_tracing, log_command_execution};

/// Load configuration, install logging and dispatch the selected command.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    // Before loading so BUSYLIGHT_* values from .env take part in overrides.
    let dotenv = dotenvy::dotenv();

    let ctx = AppContext::load(cli.config.clone()).context("failed to load configuration")?;
    init_tracing(cli.verbose || ctx.config.verbose, ctx.config.log_json)
        .context("failed to install tracing subscriber")?;

    match dotenv {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "could not load .env file"),
    }

    let command = cli.command.name();
    let started = Instant::now();

    let result = match cli.command {
        Command::Start => commands::start::run(&ctx).await,
        Command::Events { limit } => commands::events::run(&ctx, limit).await,
        Command::Status { json } => commands::status::run(&ctx, json).await,
    };

    let error_type = result
        .as_ref()
        .err()
        .and_then(|err| err.downcast_ref::<BusylightError>())
        .map(BusylightError::label);
    log_command_execution(command, started.elapsed(), result.is_ok(), error_type);

    result
}
