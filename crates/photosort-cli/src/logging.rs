use std::env;
use std::io;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `debug` or `photosort_core=debug`.
pub const LOG_ENV: &str = "PHOTOSORT_LOG";

/// Diagnostics go to stderr; stdout carries the progress and summary lines.
pub fn init_logger() {
    let filter = env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}
