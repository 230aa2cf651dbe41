//! Tracing subscriber setup for binaries and manual test runs.

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the global tracing subscriber and the miette panic hook.
///
/// Filtering follows `RUST_LOG` when set, defaulting to `info` for this crate
/// and `warn` elsewhere. Calling this more than once is a no-op beyond the
/// first successful install.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,plait=info"));

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(ErrorLayer::default());

    if registry.try_init().is_ok() {
        miette::set_panic_hook();
    }
}
