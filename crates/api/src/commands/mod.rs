//! Command implementations, one module per subcommand.

pub mod events;
pub mod start;
pub mod status;
