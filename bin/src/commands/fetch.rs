//! Fetch command implementation.
//!
//! Streams every packet from the ABX server, recovers missing sequences and
//! writes the ordered records to a file.

use crate::commands::EndpointArgs;
use crate::display::{Format, default_output_path, summary_lines};
use abx_lib::{AbxClient, OutputFormat, fetch_records, write_to_file};
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Fetch all packets once and export them.
pub(crate) async fn fetch(
    endpoint: &EndpointArgs,
    output: Option<PathBuf>,
    format: Format,
    quiet: bool,
) -> Result<()> {
    let format = OutputFormat::from(format);
    let output = output.unwrap_or_else(|| default_output_path(format));
    let client = AbxClient::new(endpoint.client_config());

    // Setup spinner
    let progress = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {pos} packets {msg}")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("from {}", client.config().endpoint()));
        pb
    };

    let outcome = fetch_records(&client, &endpoint.recovery_config(), |record| {
        progress.inc(1);
        progress.set_message(format!("last {}", record.sequence));
    })
    .await
    .with_context(|| format!("Failed to fetch from {}", client.config().endpoint()))?;

    progress.finish_and_clear();

    if !outcome.is_complete() {
        warn!(
            unresolved = outcome.recovery.unresolved.len(),
            unrequestable = outcome.recovery.unrequestable.count,
            "Exporting incomplete record set"
        );
    }

    write_to_file(&outcome.records, &output, format)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(
        records = outcome.records.len(),
        path = %output.display(),
        %format,
        "Exported records"
    );

    if !quiet {
        for line in summary_lines(&outcome) {
            println!("{line}");
        }
        println!("Output written to: {}", output.display());
    }

    Ok(())
}
