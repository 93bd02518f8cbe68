//! Tracing subscriber wiring for the binary.

use axum::BoxError;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

/// Initializes the global subscriber: `RUST_LOG` filtering (defaulting to
/// `info`) over a fmt layer.
pub fn init_subscribers() -> Result<(), BoxError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .try_init()?;
    Ok(())
}
