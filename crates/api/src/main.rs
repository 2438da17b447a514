//! Busylight - meeting status light driven by a calendar feed
//!
//! Main entry point for the command line application.

use std::process::ExitCode;

use busylight_app::Cli;
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match busylight_app::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
