use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the stderr log layer. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "vi_numeric=debug,vinum=debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}
