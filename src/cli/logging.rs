//! Logging initialization

/// Initialize logging based on debug flag
///
/// Logs go to stderr so they never mix with resources written to stdout.
/// `RUST_LOG` takes precedence over `default_level` when set.
pub fn init_logging(debug: bool, default_level: &str) {
    if !debug {
        // No logging by default (silent operation)
        return;
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}
