//! Stream session framing.
//!
//! The server sends records back to back and signals the end of the session
//! only by closing the connection, so the reader accumulates bytes until a
//! full 17-byte window is available and treats EOF as the terminator.

use abx_types::{RecordSet, TickerRecord};
use bytes::{Buf, BytesMut};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::{debug, warn};

use crate::decode_record;

const READ_BUFFER_SIZE: usize = TickerRecord::SIZE * 64;

/// Outcome of one stream-all session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Number of complete records decoded, duplicates included.
    pub received: usize,
    /// Number of records ignored because their sequence was already present.
    pub duplicates: usize,
    /// Bytes of an incomplete record left when the stream ended.
    pub trailing_bytes: usize,
    /// Whether the stream ended with a read error or timeout instead of EOF.
    pub interrupted: bool,
}

impl StreamSummary {
    /// Returns the number of records added to the set.
    #[must_use]
    pub const fn inserted(&self) -> usize {
        self.received - self.duplicates
    }

    /// Returns true if the session was cut short by malformed data or a
    /// transport failure.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.trailing_bytes > 0 || self.interrupted
    }
}

/// Reads records until EOF, inserting them into `records`.
///
/// `on_record` is called once for every record that was newly inserted.
/// A read error or a read that does not complete within `read_timeout`
/// ends the session; the records decoded up to that point are kept.
pub(crate) async fn read_records<R, F>(
    reader: &mut R,
    records: &mut RecordSet,
    read_timeout: Duration,
    mut on_record: F,
) -> StreamSummary
where
    R: AsyncRead + Unpin,
    F: FnMut(&TickerRecord),
{
    let mut summary = StreamSummary::default();
    let mut buf = BytesMut::with_capacity(READ_BUFFER_SIZE);

    loop {
        let read = match tokio::time::timeout(read_timeout, reader.read_buf(&mut buf)).await {
            Ok(Ok(read)) => read,
            Ok(Err(e)) => {
                warn!(error = %e, received = summary.received, "Error reading packets");
                summary.interrupted = true;
                break;
            }
            Err(_) => {
                warn!(
                    timeout_ms = read_timeout.as_millis(),
                    received = summary.received,
                    "Timed out reading packets"
                );
                summary.interrupted = true;
                break;
            }
        };

        let (windows, _) = buf.as_chunks::<{ TickerRecord::SIZE }>();
        for window in windows {
            let record = decode_record(window);
            summary.received += 1;
            if records.insert(record) {
                debug!(
                    sequence = record.sequence,
                    symbol = %record.symbol,
                    side = %record.side,
                    quantity = record.quantity,
                    price = record.price,
                    "Received packet"
                );
                on_record(&record);
            } else {
                summary.duplicates += 1;
                debug!(sequence = record.sequence, "Ignoring duplicate packet");
            }
        }
        let consumed = windows.len() * TickerRecord::SIZE;
        buf.advance(consumed);

        if read == 0 {
            break;
        }
    }

    if !buf.is_empty() {
        warn!(
            trailing_bytes = buf.len(),
            received = summary.received,
            "Discarding incomplete trailing packet"
        );
        summary.trailing_bytes = buf.len();
    }

    summary
}
