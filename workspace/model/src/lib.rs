pub mod auth;
pub mod entities;
pub mod users;

// Re-export tracing for use in this crate
pub use tracing;

/// Initialize the global tracing subscriber.
///
/// The log level is controlled via the RUST_LOG environment variable and
/// defaults to `info`.
#[cfg(not(test))]
pub fn init_tracing() {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .init();
}
