//! Gap recovery through single-packet resends.
//!
//! Recovery runs in passes. A pass requests every sequence number currently
//! missing from the record set, one connection per request, one request at a
//! time. Failed requests are logged and retried on the next pass. Recovery
//! stops when the set has no gaps or the pass budget is spent; running out of
//! passes yields a partial result, not an error.

use abx_types::{RecordSet, TickerRecord};
use async_trait::async_trait;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::{AbxClient, ClientError, Request};

/// Source of single-packet resends.
#[async_trait]
pub trait ResendSource: Send + Sync {
    /// Requests the packet with the given sequence number.
    ///
    /// Returns `Ok(None)` if the source answered without a full packet.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be carried out.
    async fn request_resend(&self, sequence: i32) -> Result<Option<TickerRecord>, ClientError>;
}

#[async_trait]
impl ResendSource for AbxClient {
    async fn request_resend(&self, sequence: i32) -> Result<Option<TickerRecord>, ClientError> {
        Self::request_resend(self, sequence).await
    }
}

/// Configuration for gap recovery.
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum number of passes over the missing set.
    pub max_passes: u32,
    /// Delay between passes.
    pub retry_delay: Duration,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_passes: 10,
            retry_delay: Duration::from_millis(100),
        }
    }
}

/// Outcome of a gap recovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryReport {
    /// Number of passes run.
    pub passes: u32,
    /// Number of records added by resends.
    pub recovered: usize,
    /// Number of resend requests that did not yield the requested packet.
    pub failed_attempts: usize,
    /// Requestable sequence numbers still missing when recovery stopped.
    pub unresolved: Vec<i32>,
    /// Missing sequence numbers the resend request cannot express.
    pub unrequestable: UnrequestableGaps,
}

impl RecoveryReport {
    /// Returns true if the record set ended without gaps.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty() && self.unrequestable.is_empty()
    }
}

/// Gaps outside the resend range.
///
/// A single stray sequence number can open a gap of billions, so these are
/// summarized rather than listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnrequestableGaps {
    /// Number of missing sequence numbers outside the resend range.
    pub count: u64,
    /// Lowest and highest of them.
    pub span: Option<RangeInclusive<i32>>,
}

impl UnrequestableGaps {
    /// Summarizes the gaps of `records` that fall outside the resend range.
    #[must_use]
    pub fn of(records: &RecordSet) -> Self {
        let window = Request::resend_range();
        let mut gaps = Self::default();

        for gap in records.missing_ranges() {
            let below = *gap.start()..=(*gap.end()).min(window.start() - 1);
            let above = (*gap.start()).max(window.end() + 1)..=*gap.end();

            for part in [below, above] {
                if part.is_empty() {
                    continue;
                }
                gaps.count += (i64::from(*part.end()) - i64::from(*part.start()) + 1).unsigned_abs();
                gaps.span = Some(match gaps.span.take() {
                    Some(span) => (*span.start()).min(*part.start())..=(*span.end()).max(*part.end()),
                    None => part,
                });
            }
        }
        gaps
    }

    /// Returns true if every gap can be requested.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Requestable gaps, ascending. Bounded by the size of the resend range.
fn requestable_missing(records: &RecordSet) -> Vec<i32> {
    records.missing_within(Request::resend_range())
}

/// Fills the gaps in `records` by requesting each missing packet again.
///
/// An empty record set has no gaps and returns immediately without any
/// request. Sequence numbers that the 1-byte resend field cannot express are
/// summarized in [`RecoveryReport::unrequestable`] and never requested.
///
/// A resend answered with a different sequence number counts as a failed
/// attempt. The record is kept only if it falls inside the observed range, so
/// recovery never widens the range it is filling.
pub async fn fill_gaps<S>(source: &S, records: &mut RecordSet, config: &RecoveryConfig) -> RecoveryReport
where
    S: ResendSource + ?Sized,
{
    let mut report = RecoveryReport::default();
    let mut pending = requestable_missing(records);

    let unrequestable = UnrequestableGaps::of(records);
    if !unrequestable.is_empty() {
        warn!(
            count = unrequestable.count,
            span = ?unrequestable.span,
            "Missing sequences outside the resend range cannot be requested"
        );
    }

    while !pending.is_empty() && report.passes < config.max_passes {
        if report.passes > 0 {
            tokio::time::sleep(config.retry_delay).await;
        }
        report.passes += 1;
        info!(pass = report.passes, missing = ?pending, "Requesting missing sequences");

        for &sequence in &pending {
            match source.request_resend(sequence).await {
                Ok(Some(record)) if record.sequence != sequence => {
                    report.failed_attempts += 1;
                    let in_range = records
                        .sequence_range()
                        .is_some_and(|range| range.contains(&record.sequence));
                    let kept = in_range && records.insert(record);
                    if kept {
                        report.recovered += 1;
                    }
                    warn!(
                        requested = sequence,
                        received = record.sequence,
                        kept,
                        "Resend returned a different sequence"
                    );
                }
                Ok(Some(record)) => {
                    if records.insert(record) {
                        report.recovered += 1;
                        info!(
                            sequence = record.sequence,
                            symbol = %record.symbol,
                            side = %record.side,
                            quantity = record.quantity,
                            price = record.price,
                            "Recovered packet"
                        );
                    }
                }
                Ok(None) => {
                    report.failed_attempts += 1;
                    warn!(sequence, pass = report.passes, "Could not retrieve packet");
                }
                Err(e) => {
                    report.failed_attempts += 1;
                    error!(sequence, pass = report.passes, error = %e, "Error retrieving packet");
                }
            }
        }

        pending = requestable_missing(records);
    }

    if !pending.is_empty() {
        warn!(
            passes = report.passes,
            unresolved = ?pending,
            "Recovery budget exhausted with gaps remaining"
        );
    }
    report.unresolved = pending;
    report.unrequestable = UnrequestableGaps::of(records);
    report
}
