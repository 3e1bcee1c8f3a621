#![allow(clippy::must_use_candidate)]

pub mod adapter;
mod env;
mod loader;
pub mod server;
pub mod spark;
pub mod telemetry;

use serde::Deserialize;

pub use adapter::*;
pub use server::*;
pub use spark::*;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level sparkbridge configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Spark credentials and endpoint
    pub spark: SparkConfig,
    /// Request/response translation settings
    #[serde(default)]
    pub adapter: AdapterConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
