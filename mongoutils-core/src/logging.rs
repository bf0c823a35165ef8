//! Logging setup controlled by environment variables.
//!
//! # Environment Variables
//!
//! - `MONGOUTILS_DEBUG=true|1|yes` - Enable debug logging
//! - `MONGOUTILS_LOG_LEVEL=trace|debug|info|warn|error` - Set a specific level
//! - `MONGOUTILS_LOG_FORMAT=json|pretty|compact` - Output format (default: json)
//!
//! Inside the crate, use the standard tracing macros:
//!
//! ```rust,ignore
//! use tracing::debug;
//!
//! debug!(collection = %name, documents = ids.len(), "Applying counter batch");
//! ```
//!
//! Installing a subscriber requires the `tracing-subscriber` feature; without
//! it [`init`] is a no-op and the host application owns the subscriber.

use std::env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Check if debug logging is enabled via `MONGOUTILS_DEBUG`.
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("MONGOUTILS_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `MONGOUTILS_LOG_LEVEL`.
///
/// Defaults to "debug" when `MONGOUTILS_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    resolve_level(
        is_debug_enabled(),
        env::var("MONGOUTILS_LOG_LEVEL").ok().as_deref(),
    )
}

/// Get the configured log format from `MONGOUTILS_LOG_FORMAT`.
pub fn get_log_format() -> &'static str {
    env::var("MONGOUTILS_LOG_FORMAT")
        .map(|f| parse_format(&f))
        .unwrap_or("json")
}

fn resolve_level(debug: bool, level: Option<&str>) -> &'static str {
    let fallback = if debug { "debug" } else { "warn" };
    level.and_then(parse_level).unwrap_or(fallback)
}

fn parse_level(level: &str) -> Option<&'static str> {
    match level.to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        _ => None,
    }
}

fn parse_format(format: &str) -> &'static str {
    match format.to_lowercase().as_str() {
        "pretty" => "pretty",
        "compact" => "compact",
        _ => "json",
    }
}

/// Initialize logging from the environment.
///
/// Does nothing unless `MONGOUTILS_DEBUG` or `MONGOUTILS_LOG_LEVEL` is set.
/// Subsequent calls are no-ops.
pub fn init() {
    if !is_debug_enabled() && env::var("MONGOUTILS_LOG_LEVEL").is_err() {
        return;
    }
    init_with_level(get_log_level());
}

/// Initialize logging at an explicit level, ignoring `MONGOUTILS_LOG_LEVEL`.
///
/// Unknown levels fall back to "warn".
pub fn init_with_level(level: &str) {
    let level = parse_level(level).unwrap_or("warn");

    INIT.call_once(|| {
        #[cfg(feature = "tracing-subscriber")]
        {
            use tracing_subscriber::{EnvFilter, fmt, prelude::*};

            let filter = EnvFilter::try_new(format!(
                "mongoutils={},mongoutils_core={}",
                level, level
            ))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

            let registry = tracing_subscriber::registry().with(filter);
            let installed = match get_log_format() {
                "json" => registry.with(fmt::layer().json()).try_init(),
                "compact" => registry.with(fmt::layer().compact()).try_init(),
                _ => registry.with(fmt::layer().pretty()).try_init(),
            };

            if installed.is_ok() {
                tracing::info!(
                    level = level,
                    format = get_log_format(),
                    "mongoutils logging initialized"
                );
            }
        }

        #[cfg(not(feature = "tracing-subscriber"))]
        {
            let _ = level;
        }
    });
}
