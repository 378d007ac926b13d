//! Tracing/logging initialization.
//!
//! The store and audit crates emit `tracing` events at mutation and flush
//! points; hosts call [`init`] once at startup to surface them.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset: quiet overall, but keep the
/// store's flush/audit diagnostics visible.
const DEFAULT_FILTER: &str = "info,slabtrack_store=debug,slabtrack_audit=debug";

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // JSON logs + timestamps, configurable via RUST_LOG.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
