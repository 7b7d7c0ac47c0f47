//! Tracing setup for the CLI and tests.
//!
//! Log lines go to stderr. Stdout carries exported records.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// `RUST_LOG` wins over the configured level; an unparsable level means `info`.
fn filter_for(config: &LoggingConfig) -> (EnvFilter, bool) {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return (filter, true);
    }
    match EnvFilter::try_new(&config.level) {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new("info"), false),
    }
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed, in which case the
/// existing one keeps receiving events.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let (filter, level_ok) = filter_for(config);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = if config.json {
        builder.json().with_current_span(false).try_init().is_ok()
    } else {
        builder.with_target(false).compact().try_init().is_ok()
    };

    if installed && !level_ok {
        tracing::warn!(level = %config.level, "unrecognized log level, using info");
    }
    installed
}
