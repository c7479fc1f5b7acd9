//! Tracing subscriber setup for the daemon binary.
//!
//! Output is either compact human-readable lines or newline-delimited
//! JSON, chosen by the `log_format` config key. `RUST_LOG`, when set,
//! overrides the configured level filter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output shape, from the `log_format` config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact lines for a terminal.
    Human,
    /// One JSON object per line, for collectors.
    Json,
}

impl LogFormat {
    /// Parse a config string. Anything other than `"json"` selects human
    /// output.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Human
        }
    }
}

/// Install the process-wide subscriber.
///
/// # Panics
///
/// Panics when called a second time in the same process.
pub fn init_logging(format: LogFormat, level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json().with_target(true)).init(),
        LogFormat::Human => registry.with(fmt::layer().with_target(true)).init(),
    }
}
