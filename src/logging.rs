//! Logging setup.
//!
//! Structured logging through the `tracing` crate. The filter honors the
//! `REGMENU_LOG` environment variable when set, otherwise falls back to the
//! level the caller picked (the CLI maps `--debug` here).

use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable overriding the log filter, `tracing` directive syntax.
pub const LOG_ENV_VAR: &str = "REGMENU_LOG";

/// Initialize the global subscriber, writing to stderr.
///
/// Generated registry text goes to files and summaries to stdout, so
/// diagnostics stay on stderr where they don't mix with command output.
/// Calling this twice returns an error from the subscriber; the CLI calls it
/// once at startup.
pub fn init_logging(debug: bool) -> Result<(), anyhow::Error> {
    let filter = match EnvFilter::try_from_env(LOG_ENV_VAR) {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new(if debug { "debug" } else { "info" }),
    };

    Registry::default()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))?;

    Ok(())
}
