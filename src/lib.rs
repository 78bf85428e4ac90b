//! canno - command-line front end for the Canno spreadsheet engine.

pub mod config;
pub mod error;
pub mod repl;

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV: &str = "CANNO_LOG";

/// Install the stderr log subscriber.
///
/// `CANNO_LOG` wins over `fallback`; an unparsable fallback means `warn`.
pub fn init_logging(fallback: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
    if let Err(err) = installed {
        tracing::debug!(%err, "keeping the existing log subscriber");
    }
}
