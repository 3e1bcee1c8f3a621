use std::net::{Ipv4Addr, SocketAddr};

use serde::Deserialize;

/// Port used when no listen address is configured
pub const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub listen_address: Option<SocketAddr>,
}

impl ServerConfig {
    /// Configured listen address, or `127.0.0.1:8000`
    pub fn listen_address(&self) -> SocketAddr {
        self.listen_address
            .unwrap_or_else(|| SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)))
    }
}
