//! Configuration loading
//!
//! Reads TOML or JSON files and applies `BUSYLIGHT_*` environment overrides.

pub mod loader;

// Re-export commonly used items
pub use loader::{apply_env_overrides, load, load_from_file, probe_config_paths};
