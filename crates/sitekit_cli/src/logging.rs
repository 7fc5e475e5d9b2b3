//! Subscriber setup for the `tracing` events emitted by the build engine.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::LogFormatArg;
use crate::error::CliError;

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins over `default_level` when set. Text output drops
/// timestamps and targets so per-file progress lines stay short.
pub fn init_logging(default_level: &str, log_format: LogFormatArg) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let registry = tracing_subscriber::registry().with(filter);

    match log_format {
        LogFormatArg::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .without_time()
                    .with_target(false),
            )
            .try_init(),
        LogFormatArg::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    }
    .map_err(|e| CliError::LoggingInit(e.to_string()))
}
