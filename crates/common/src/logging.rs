//! Logging and tracing initialization.
//!
//! Logs always go to stderr; stdout is reserved for command output such as
//! render results.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LoggingConfig;

/// Level used when the configured filter cannot be parsed.
const FALLBACK_LEVEL: &str = "info";

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Only the first
/// call installs a subscriber.
pub fn init_logging(config: &LoggingConfig) {
    let (filter, rejected) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, None),
        Err(_) => level_filter(&config.level),
    };

    let layer = fmt::layer().with_writer(std::io::stderr).with_target(true);
    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry.with(layer.json()).try_init()
    } else {
        registry.with(layer.compact()).try_init()
    };

    if let Err(e) = installed {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
    if let Some(e) = rejected {
        tracing::warn!(level = %config.level, error = %e, "Invalid log level, using {FALLBACK_LEVEL}");
    }
}

/// Parse a level or directive list.
///
/// An invalid filter falls back to `info`; the parse error is handed back
/// so it can be logged once a subscriber exists.
fn level_filter(level: &str) -> (EnvFilter, Option<ParseError>) {
    match EnvFilter::try_new(level) {
        Ok(filter) => (filter, None),
        Err(e) => (EnvFilter::new(FALLBACK_LEVEL), Some(e)),
    }
}
