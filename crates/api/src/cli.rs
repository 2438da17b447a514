//! Command line definition

use std::path::PathBuf;
use std::time::Duration;

use busylight_common::parse_duration;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "busylight", version, about = "Meeting status light driven by a calendar feed")]
pub struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(short, long, global = true, env = "BUSYLIGHT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Drive the display from the calendar until interrupted
    Start,
    /// Fetch and print upcoming events
    Events {
        /// How far ahead to look, e.g. `90m`, `24h`, `1w`
        #[arg(long, default_value = "24h", value_parser = parse_duration)]
        limit: Duration,
    },
    /// Show the current display state without publishing it
    Status {
        /// Print the state and payload as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Events { .. } => "events",
            Self::Status { .. } => "status",
        }
    }
}
