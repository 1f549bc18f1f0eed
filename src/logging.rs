//! Build output
//!
//! Buildpack output goes to stdout without timestamps or targets so it reads
//! cleanly in `pack build` logs. Verbosity is decided by the caller.

use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    /// Parse a `BP_LOG_LEVEL` value. Only `DEBUG` (any case) raises verbosity.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("debug") => LogLevel::Debug,
            _ => LogLevel::Info,
        }
    }

    fn as_level(self) -> Level {
        match self {
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
        }
    }
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(level: LogLevel) {
    let filter = EnvFilter::default().add_directive(level.as_level().into());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_level(false)
        .try_init();
}
