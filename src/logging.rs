use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(debug_mode: bool) -> &'static str {
    if debug_mode {
        "scribe=debug,scribe_lib=debug"
    } else {
        "scribe=info,scribe_lib=info"
    }
}

/// Install the global subscriber, writing to stderr. `RUST_LOG` wins over
/// the debug setting. Calling this twice is a no-op.
pub fn init(debug_mode: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug_mode)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
