//! Tracing subscriber setup.
//!
//! Logs go to stderr; stdout carries converted data only. `RUST_LOG`, when set,
//! overrides the configured level.

use tracing_subscriber::EnvFilter;

pub const DEFAULT_LEVEL: &str = "info";

pub fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber; a second call is a no-op.
pub fn init(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
