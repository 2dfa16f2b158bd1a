use std::time::Instant;

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the stderr subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Log a progress message tagged with the seconds elapsed since `start`.
pub fn log_with_elapsed(start: Instant, message: &str) {
    let elapsed = start.elapsed().as_secs_f32();
    info!(elapsed_s = elapsed, "{message}");
}
