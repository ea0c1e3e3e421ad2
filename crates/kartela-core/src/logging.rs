//! Logging and tracing initialization.
//!
//! The level is controlled by `RUST_LOG` (default `info`), the format by
//! `LOG_FORMAT` (`json` for log aggregation, anything else for plain text).
//!
//! ```bash
//! RUST_LOG=kartela_core=debug,tower_http=debug,sqlx=warn kartela serve
//! ```

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging according to `LOG_FORMAT`.
///
/// Call once at startup, before creating the `App`.
pub fn init_from_env() {
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => init_logging_json(),
        _ => init_logging(),
    }
}

/// Initialize plain-text logging with sensible defaults.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize JSON-formatted logging (recommended for production).
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
pub fn init_logging_json() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}
