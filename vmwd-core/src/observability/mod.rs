//! Observability infrastructure: tracing and metrics.
//!
//! Binaries call [`init`] once at startup; the library itself only emits
//! `tracing` events and `metrics` samples.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod metrics;

/// Initialize the global tracing subscriber and describe core metrics.
///
/// The filter comes from `RUST_LOG`, defaulting to `default_level`
/// (e.g. `"info"`, `"vmwd_core=debug"`).
///
/// # Errors
/// Returns an error if a global subscriber is already installed or the
/// filter directive is invalid.
pub fn init(default_level: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    metrics::register_core_metrics();

    tracing::debug!("Observability initialized");
    Ok(())
}
