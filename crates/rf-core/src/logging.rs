//! Diagnostics on stderr. Stdout is reserved for the single failure line.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`tracing` directives).
pub const LOG_ENV_VAR: &str = "RINGFENCE_LOG";

/// Install the global subscriber. At the default `warn` level a successful
/// run writes nothing.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
