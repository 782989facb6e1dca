//! Logging setup
//!
//! The library only emits `tracing` events; front-ends decide where they go.
//! [`init_tracing`] installs a formatted subscriber honouring `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Install a global `fmt` subscriber.
///
/// `default_directive` (e.g. `"dice_lab=info"`) applies when `RUST_LOG` is
/// unset or invalid. Returns `false` if a subscriber was already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
