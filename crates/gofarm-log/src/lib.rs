// ABOUTME: Shared logging setup for all gofarm binaries
// ABOUTME: Two functions: init() for normal runs, init_verbose() for --verbose runs

use tracing_subscriber::EnvFilter;

/// Standard logging to stderr. Default: INFO level, RUST_LOG override.
///
/// Logs go to stderr so they never mix with the GTP response stream on
/// stdout.
pub fn init() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();
}

/// Verbose logging to stderr. Default: DEBUG level, RUST_LOG override.
/// Used when a binary is run with --verbose.
pub fn init_verbose() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()))
        .init();
}
