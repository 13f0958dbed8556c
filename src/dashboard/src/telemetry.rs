use tracing_subscriber::EnvFilter;

use crate::settings::LogLevel;

/// Installs the global fmt subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
