//! Operational tracing for the harness.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: operator diagnostics via `RUST_LOG`, output to
//!   stderr. Every appended dashboard line is echoed here as `[CATEGORY] message`.
//!
//! - **Log store (`core::log_store`)**: the bounded lines the dashboard reads
//!   back over HTTP. Always written, unaffected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "dockersim=info,dockersim_server=info";

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=dockersim=debug cargo run -p dockersim-server
/// ```
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
