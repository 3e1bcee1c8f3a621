use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// OpenAI-compatible bridge to the iFlytek Spark chat API
#[derive(Debug, Parser)]
#[command(name = "sparkbridge", about = "Serve iFlytek Spark behind OpenAI-compatible endpoints")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "sparkbridge.toml", env = "SPARKBRIDGE_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "SPARKBRIDGE_LISTEN")]
    pub listen: Option<SocketAddr>,
}
