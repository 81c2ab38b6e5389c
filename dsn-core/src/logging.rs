//! Logging setup for dsn-injector.
//!
//! The crate emits `tracing` events on its own (parsing at `debug`, env file
//! loading at `info`). Applications with their own subscriber need nothing
//! from this module. Those without one can enable the `tracing-subscriber`
//! feature and call [`init`].
//!
//! # Environment Variables
//!
//! - `DSN_DEBUG=true|1|yes` - Enable debug logging
//! - `DSN_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific log level
//! - `DSN_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! ```rust,no_run
//! use dsn_core::logging;
//!
//! logging::init();
//! ```

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Enables debug logging when set to a truthy value.
pub const DEBUG_VAR: &str = "DSN_DEBUG";
/// Overrides the log level.
pub const LEVEL_VAR: &str = "DSN_LOG_LEVEL";
/// Selects the output format.
pub const FORMAT_VAR: &str = "DSN_LOG_FORMAT";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Multi-line human readable output.
    Pretty,
    /// Single-line human readable output.
    Compact,
}

impl LogFormat {
    fn from_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "pretty" => Self::Pretty,
            "compact" => Self::Compact,
            _ => Self::Json,
        }
    }

    /// Lowercase format name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
            Self::Compact => "compact",
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn resolve_level(debug: bool, level: Option<&str>) -> &'static str {
    let fallback = if debug { "debug" } else { "warn" };
    match level.map(str::to_lowercase).as_deref() {
        Some("trace") => "trace",
        Some("debug") => "debug",
        Some("info") => "info",
        Some("warn") => "warn",
        Some("error") => "error",
        _ => fallback,
    }
}

/// Check if `DSN_DEBUG` requests debug logging.
pub fn is_debug_enabled() -> bool {
    env::var(DEBUG_VAR).is_ok_and(|v| is_truthy(&v))
}

/// Log level from `DSN_LOG_LEVEL`, defaulting to `debug` under `DSN_DEBUG`
/// and `warn` otherwise.
pub fn log_level() -> &'static str {
    resolve_level(is_debug_enabled(), env::var(LEVEL_VAR).ok().as_deref())
}

/// Output format from `DSN_LOG_FORMAT`.
pub fn log_format() -> LogFormat {
    env::var(FORMAT_VAR)
        .map(|f| LogFormat::from_name(&f))
        .unwrap_or(LogFormat::Json)
}

/// Install a global subscriber according to the `DSN_*` variables.
///
/// Does nothing unless `DSN_DEBUG` or `DSN_LOG_LEVEL` is set. Only the first
/// call has an effect. Without the `tracing-subscriber` feature no
/// subscriber is installed.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var(LEVEL_VAR).is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let level = log_level();
            let filter = EnvFilter::try_new(format!(
                "dsn_injector={level},dsn_core={level}"
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let registry = tracing_subscriber::registry().with(filter);
            // try_init: the host application may already own the global subscriber
            let installed = match log_format() {
                LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
                LogFormat::Compact => registry.with(fmt::layer().compact()).try_init(),
                LogFormat::Pretty => registry.with(fmt::layer().pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level,
                    format = log_format().name(),
                    "dsn-injector logging initialized"
                );
            }
        }
    });
}
