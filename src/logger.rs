/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`, defaults to `info`. Safe to call more than once.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .try_init();
}
