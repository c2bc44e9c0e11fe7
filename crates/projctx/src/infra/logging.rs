//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

static LOG_ENV: &str = "PROJCTX_LOG";

/// Install the global fmt subscriber. `PROJCTX_LOG` wins over `RUST_LOG`;
/// both default to `info`. Safe to call more than once.
pub fn init() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
