//! Full fetch: stream session followed by gap recovery.

use abx_types::{RecordSet, TickerRecord};
use tracing::info;

use crate::{AbxClient, ClientError, RecoveryConfig, RecoveryReport, StreamSummary, fill_gaps};

/// Result of a full fetch.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// The records collected, ascending by sequence.
    pub records: RecordSet,
    /// Summary of the initial stream session.
    pub stream: StreamSummary,
    /// Summary of the gap recovery that followed.
    pub recovery: RecoveryReport,
}

impl FetchOutcome {
    /// Returns true if the record set has no gaps.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.recovery.is_complete()
    }
}

/// Streams all packets, then recovers the gaps.
///
/// `on_record` is called for every record inserted by the stream session.
///
/// # Errors
///
/// Returns an error only if the stream session could not be started. Resend
/// failures are absorbed by recovery and show up in the report.
pub async fn fetch_records<F>(
    client: &AbxClient,
    recovery: &RecoveryConfig,
    on_record: F,
) -> Result<FetchOutcome, ClientError>
where
    F: FnMut(&TickerRecord),
{
    let mut records = RecordSet::new();
    let stream = client.stream_all(&mut records, on_record).await?;
    let recovery = fill_gaps(client, &mut records, recovery).await;

    info!(
        records = records.len(),
        recovered = recovery.recovered,
        passes = recovery.passes,
        complete = recovery.is_complete(),
        "Fetch finished"
    );

    Ok(FetchOutcome {
        records,
        stream,
        recovery,
    })
}
