//! Structured logging setup for hosts that drive the registry.
//!
//! The library itself only emits `tracing` events; binaries call
//! [`init_logging`] once to install a console subscriber.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config sets one.
pub const DEFAULT_FILTER: &str = "info";

/// Builds the filter: `RUST_LOG` wins, then `level`, then [`DEFAULT_FILTER`].
pub fn env_filter(level: Option<&str>) -> EnvFilter {
    let fallback = match level {
        Some(level) if !level.trim().is_empty() => level,
        _ => DEFAULT_FILTER,
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Installs a console subscriber with module paths and uptime timestamps.
///
/// Returns false if a global subscriber was already set.
pub fn init_logging(level: Option<&str>) -> bool {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(console_layer)
        .try_init()
        .is_ok()
}
