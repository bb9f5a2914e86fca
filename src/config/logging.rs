//! Tracing setup for the command line tool.
//!
//! Events go to stderr so stdout only ever carries the rendered tree or JSON.

use std::io::{IsTerminal, stderr};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the config file sets one.
pub const DEFAULT_FILTER: &str = "warn";

/// Build the event filter.
///
/// `RUST_LOG` wins, then `configured` (the config file's `log_level`), then
/// [`DEFAULT_FILTER`]. An unparsable directive falls through to the next
/// source.
#[must_use]
pub fn env_filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber.
///
/// Calling this twice keeps the first subscriber.
pub fn init_tracing(configured: Option<&str>) {
    let layer = fmt::layer()
        .with_writer(stderr)
        .with_ansi(stderr().is_terminal())
        .with_target(true);

    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(env_filter(configured))
        .try_init();
}
