use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber. `RUST_LOG` takes precedence over `verbosity`
/// (0 = warn, 1 = info, 2 = debug, 3+ = trace).
pub fn init(verbosity: u8) -> crate::Result<()> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| crate::Error::LogInitFailed(e.to_string()))
}
