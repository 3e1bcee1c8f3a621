//! Logging setup for sparkbridge
//!
//! Installs a `tracing-subscriber` registry with an `EnvFilter` and a fmt
//! layer writing either human-readable or JSON lines.

use sparkbridge_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize the global subscriber from configuration
///
/// `default_filter` applies when no telemetry section is configured. An
/// unparseable filter falls back to `info` rather than failing startup.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed
pub fn init(config: Option<&TelemetryConfig>, default_filter: &str) -> anyhow::Result<()> {
    let (directives, format) =
        config.map_or((default_filter, LogFormat::Text), |c| (c.filter.as_str(), c.format));

    let filter = build_filter(directives);

    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

/// Parse filter directives, falling back to `info`
fn build_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|e| {
        eprintln!("invalid log filter '{directives}': {e}, falling back to info");
        EnvFilter::new("info")
    })
}
