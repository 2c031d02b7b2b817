//! Console logging setup.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,cantata=debug";

/// Installs a console subscriber filtered by `RUST_LOG`.
///
/// Falls back to [`DEFAULT_FILTER`] when `RUST_LOG` is unset or invalid.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(env_filter)
}

/// Installs a console subscriber with an explicit filter directive.
///
/// # Errors
///
/// Fails if `filter` does not parse or a global subscriber is already
/// installed.
pub fn init_logging_with_filter(
    filter: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    install(EnvFilter::try_new(filter)?)
}

fn install(env_filter: EnvFilter) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()?;

    tracing::debug!("Logging initialized");
    Ok(())
}
