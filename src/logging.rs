//! Logging setup for the command-line tool.
//!
//! The library logs through the `log` facade; the binary installs
//! `env_logger` writing to stderr. `RUST_LOG` takes precedence over the level
//! chosen on the command line.

use log::LevelFilter;

/// Parse a `--log-level` value.
pub fn parse_level(value: &str) -> Option<LevelFilter> {
    value.parse().ok()
}

/// Install the global logger. Calling it twice is harmless.
pub fn init(level: LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format_timestamp(None)
        .format_target(level >= LevelFilter::Debug)
        .parse_default_env();
    let _ = builder.try_init();
}
