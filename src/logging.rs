use tracing_subscriber::EnvFilter;

/// Install the process-wide `tracing` subscriber.
///
/// Verbosity is controlled by `FMAN_LOG` (falls back to `warn` so a default
/// run stays quiet); the diagnostic sink of the error-handling design (§7)
/// is whatever this subscriber is configured to write to — stderr, so it
/// never interleaves with the prompt on stdout.
pub fn init() {
    let filter = EnvFilter::try_from_env("FMAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
