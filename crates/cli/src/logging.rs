use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::cli::LogFormat;

/// Install the global subscriber. Logs go to stderr; stdout belongs to the
/// stdio transport.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init_tracing(level: &str, format: LogFormat) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|error| anyhow!("initialize logging: {error}"))
}
