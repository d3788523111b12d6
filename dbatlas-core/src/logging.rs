//! Logging setup shared by embedding applications.

use tracing_subscriber::EnvFilter;

use crate::error::{CatalogError, Result};

/// Initializes structured logging.
///
/// The default level follows `verbose` (0=INFO, 1=DEBUG, 2+=TRACE) or is
/// forced to ERROR when `quiet` is set; either way `RUST_LOG` can override
/// per-module levels.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<()> {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .try_init()
        .map_err(|e| CatalogError::configuration(format!("failed to initialize logging: {e}")))?;

    Ok(())
}
