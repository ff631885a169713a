#![forbid(unsafe_code)]

//! Logging setup helpers.
//!
//! The engines log through `tracing` unconditionally; installing a
//! subscriber is left to the host. With the `tracing-json` feature,
//! [`init_json`] installs a JSON formatter filtered by `RUST_LOG`
//! (default `info`).

#[cfg(feature = "tracing-json")]
use tracing_subscriber::EnvFilter;

/// Error returned when a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Install a global JSON subscriber.
#[cfg(feature = "tracing-json")]
pub fn init_json() -> Result<(), InitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .try_init()
}
