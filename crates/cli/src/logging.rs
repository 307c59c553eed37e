use recmatch_core::config::{AppConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Output goes to stderr so stdout carries only
/// command JSON. `RUST_LOG`, when set, takes precedence over `logging.level`.
pub fn init(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed when embedded in tests.
    let _ = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
