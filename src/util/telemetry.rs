//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Install a default env-filtered fmt subscriber unless one is already set.
///
/// `RUST_LOG` takes precedence; `default_directive` (e.g. `"task_throttler=debug"`)
/// applies when it is absent or malformed.
pub fn init_tracing(default_directive: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
