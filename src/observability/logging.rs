//! Structured logging setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with an environment filter.
///
/// Defaults to debug-level output for this crate when `RUST_LOG` is unset.
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sense_pipeline=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
