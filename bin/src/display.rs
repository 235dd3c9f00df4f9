//! Display utilities and output paths for the abx CLI.

use abx_lib::{FetchOutcome, OutputFormat};
use clap::ValueEnum;
use directories::UserDirs;
use std::path::PathBuf;

/// Output format for fetched records.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Json,
    Ndjson,
    Csv,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
            Format::Csv => Self::Csv,
        }
    }
}

/// Returns `output.<ext>` in the home directory, or in the working directory
/// when no home directory is known.
pub(crate) fn default_output_path(format: OutputFormat) -> PathBuf {
    let name = format!("output.{}", format.extension());
    UserDirs::new().map_or_else(|| PathBuf::from(&name), |dirs| dirs.home_dir().join(&name))
}

/// Builds the human-readable summary printed after a fetch.
pub(crate) fn summary_lines(outcome: &FetchOutcome) -> Vec<String> {
    let records = &outcome.records;
    let mut lines = Vec::new();

    match records.sequence_range() {
        Some(range) => lines.push(format!(
            "Fetched {} records (sequences {} to {})",
            records.len(),
            range.start(),
            range.end()
        )),
        None => lines.push("Fetched 0 records".to_string()),
    }

    let stream = &outcome.stream;
    if stream.duplicates > 0 {
        lines.push(format!("Ignored {} duplicate packets", stream.duplicates));
    }
    if stream.is_truncated() {
        lines.push(format!(
            "Stream ended early ({} trailing bytes discarded)",
            stream.trailing_bytes
        ));
    }

    let recovery = &outcome.recovery;
    if recovery.recovered > 0 {
        lines.push(format!(
            "Recovered {} missing packets in {} passes",
            recovery.recovered, recovery.passes
        ));
    }
    if !recovery.unresolved.is_empty() {
        lines.push(format!("Still missing: {:?}", recovery.unresolved));
    }
    if let Some(span) = &recovery.unrequestable.span {
        lines.push(format!(
            "Cannot be requested (outside 0..=255): {} sequences between {} and {}",
            recovery.unrequestable.count,
            span.start(),
            span.end()
        ));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use abx_lib::{RecordSet, RecoveryReport, Side, Symbol, TickerRecord, UnrequestableGaps};

    fn outcome(sequences: &[i32]) -> FetchOutcome {
        let records: RecordSet = sequences
            .iter()
            .map(|&s| TickerRecord::new(s, Symbol::new(*b"AAPL"), Side::Buy, 1, 1))
            .collect();
        FetchOutcome {
            records,
            ..FetchOutcome::default()
        }
    }

    #[test]
    fn test_format_maps_to_output_format() {
        assert_eq!(OutputFormat::from(Format::Json), OutputFormat::Json);
        assert_eq!(OutputFormat::from(Format::Ndjson), OutputFormat::Ndjson);
        assert_eq!(OutputFormat::from(Format::Csv), OutputFormat::Csv);
    }

    #[test]
    fn test_default_output_path() {
        let path = default_output_path(OutputFormat::Csv);
        assert_eq!(path.file_name().unwrap(), "output.csv");
    }

    #[test]
    fn test_summary_complete() {
        let lines = summary_lines(&outcome(&[1, 2, 3]));
        assert_eq!(lines, vec!["Fetched 3 records (sequences 1 to 3)"]);
    }

    #[test]
    fn test_summary_empty() {
        let lines = summary_lines(&outcome(&[]));
        assert_eq!(lines, vec!["Fetched 0 records"]);
    }

    #[test]
    fn test_summary_with_unresolved() {
        let mut outcome = outcome(&[1, 3]);
        outcome.recovery = RecoveryReport {
            passes: 10,
            unresolved: vec![2],
            ..RecoveryReport::default()
        };

        let lines = summary_lines(&outcome);
        assert_eq!(lines[1], "Still missing: [2]");
    }

    #[test]
    fn test_summary_with_unrequestable() {
        let mut outcome = outcome(&[1, i32::MAX]);
        outcome.recovery = RecoveryReport {
            unrequestable: UnrequestableGaps {
                count: 2_147_483_391,
                span: Some(256..=i32::MAX - 1),
            },
            ..RecoveryReport::default()
        };

        let lines = summary_lines(&outcome);
        assert_eq!(
            lines[1],
            "Cannot be requested (outside 0..=255): 2147483391 sequences between 256 and 2147483646"
        );
    }
}
