//! Diagnostics via `tracing` and `tracing-subscriber`.
//!
//! Events go to stderr so they never mix with the interpreter's stdout.
//! The filter accepts the usual `EnvFilter` directives (`warn`, `debug`,
//! `alloc_book=trace`, ...).

use crate::{Error, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when none is configured.
pub const DEFAULT_FILTER: &str = "warn";

/// Install the global subscriber.
///
/// Calling it a second time keeps the first subscriber and logs the
/// refusal at `debug`.
pub fn init_logging(filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| Error::InvalidArgument(format!("invalid log filter '{}': {}", filter, e)))?;

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .try_init();
    if let Err(e) = installed {
        // an earlier subscriber keeps receiving events
        tracing::debug!(error = %e, "tracing subscriber already installed");
    }
    Ok(())
}
