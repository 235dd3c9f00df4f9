//! CLI command implementations.

pub(crate) mod fetch;
pub(crate) mod serve;

use abx_lib::{ClientConfig, RecoveryConfig};
use clap::Args;
use std::time::Duration;

/// ABX endpoint and recovery settings shared by all commands.
#[derive(Debug, Args)]
pub(crate) struct EndpointArgs {
    /// ABX server host
    #[arg(long, env = "ABX_HOST", default_value = "localhost")]
    pub(crate) host: String,

    /// ABX server port
    #[arg(long, env = "ABX_PORT", default_value = "3000")]
    pub(crate) port: u16,

    /// Connection timeout in milliseconds
    #[arg(long, env = "ABX_CONNECT_TIMEOUT_MS", default_value = "5000")]
    pub(crate) connect_timeout_ms: u64,

    /// Per-read timeout in milliseconds
    #[arg(long, env = "ABX_READ_TIMEOUT_MS", default_value = "10000")]
    pub(crate) read_timeout_ms: u64,

    /// Maximum number of gap recovery passes
    #[arg(long, env = "ABX_MAX_PASSES", default_value = "10")]
    pub(crate) max_passes: u32,

    /// Delay between recovery passes in milliseconds
    #[arg(long, env = "ABX_RETRY_DELAY_MS", default_value = "100")]
    pub(crate) retry_delay_ms: u64,
}

impl EndpointArgs {
    pub(crate) fn client_config(&self) -> ClientConfig {
        ClientConfig {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            read_timeout: Duration::from_millis(self.read_timeout_ms),
            ..ClientConfig::new(self.host.clone(), self.port)
        }
    }

    pub(crate) const fn recovery_config(&self) -> RecoveryConfig {
        RecoveryConfig {
            max_passes: self.max_passes,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}
