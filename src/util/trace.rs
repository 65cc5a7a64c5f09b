//! Structured tracing output for the binaries.
//!
//! Filtering follows `RUST_LOG`, for example:
//! ```bash
//! RUST_LOG=tollway=debug,tower_http=info
//! ```

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialises the tracer, using tracing subscription.
/// This is optional, not calling this function will simply
/// not log traces.
///
/// Returns `false` if a global subscriber was already installed.
pub fn initialize_tracer() -> bool {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(fmt_layer)
        .try_init()
        .is_ok()
}
