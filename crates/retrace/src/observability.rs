//! Tracing setup.
//!
//! retrace emits `tracing` events from the executor (attempt failures,
//! exhaustion), the log sinks (writes, background failures) and the notifier
//! (deliveries). Libraries should leave subscriber installation to the
//! application; [`init_tracing`] is a convenience for binaries and examples.

/// Install a formatting subscriber filtered by `RUST_LOG`.
///
/// Falls back to `default_filter` (e.g. `"retrace=info"`) when `RUST_LOG` is
/// unset or invalid. Does nothing if a global subscriber is already set.
pub fn init_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
