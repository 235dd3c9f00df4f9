//! Server configuration.

use abx_fetch::{ClientConfig, RecoveryConfig};
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Configuration for the HTTP endpoint.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP server listens on.
    pub bind: SocketAddr,
    /// Connection settings for the ABX server.
    pub client: ClientConfig,
    /// Gap recovery settings.
    pub recovery: RecoveryConfig,
    /// File the exported JSON is written to after each fetch.
    pub output_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 8080)),
            client: ClientConfig::default(),
            recovery: RecoveryConfig::default(),
            output_path: PathBuf::from("output.json"),
        }
    }
}
