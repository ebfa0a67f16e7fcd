//! Tracing subscriber setup for g.
//!
//! Logs go to stderr so they never mix with the listing. The filter is read from
//! `G_LOG` (same syntax as `RUST_LOG`) and defaults to `warn`.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "G_LOG";

/// Builds the filter from `G_LOG`, falling back to `warn` when unset or invalid.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init() {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false);

    let _ = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_does_not_panic() {
        init();
        init();
        tracing::debug!("still fine");
    }
}
