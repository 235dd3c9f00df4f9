//! Serve command implementation.

use crate::commands::EndpointArgs;
use crate::display::default_output_path;
use abx_lib::{OutputFormat, ServerConfig};
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

/// Run the HTTP endpoint until interrupted.
pub(crate) async fn serve(
    endpoint: &EndpointArgs,
    bind: SocketAddr,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = ServerConfig {
        bind,
        client: endpoint.client_config(),
        recovery: endpoint.recovery_config(),
        output_path: output.unwrap_or_else(|| default_output_path(OutputFormat::Json)),
    };

    info!(
        %bind,
        abx = %config.client.endpoint(),
        max_passes = config.recovery.max_passes,
        "Starting HTTP endpoint"
    );

    abx_lib::serve(config)
        .await
        .with_context(|| format!("HTTP server on {bind} failed"))
}
