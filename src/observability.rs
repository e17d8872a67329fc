use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber. Intended for binaries and test
/// harnesses embedding the engine; the library itself only emits events.
///
/// Honors `RUST_LOG`; defaults to `info`. Safe to call more than once, a
/// second install attempt is ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
