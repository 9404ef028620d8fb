//! Tracing subscriber setup for hosts that do not install their own.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "floorplan_view=info";

static INIT: Once = Once::new();

/// Install a `fmt` subscriber honoring `RUST_LOG`.
///
/// Safe to call more than once; only the first call has an effect, and a
/// subscriber installed by the host beforehand is left alone.
pub fn init() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let result = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init();
        if result.is_err() {
            tracing::debug!("Global subscriber already installed, keeping it");
        }
    });
}
