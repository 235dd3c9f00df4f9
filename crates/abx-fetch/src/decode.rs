//! Binary decoding of ABX ticker packets.

use abx_types::{Side, Symbol, TickerRecord};
use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

/// Errors that can occur while decoding a buffer of records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Invalid data length (not a multiple of the record size).
    #[error("Invalid data length: {0} bytes (expected multiple of {1})")]
    InvalidLength(usize, usize),
}

/// Decodes a single record from a 17-byte window.
///
/// Layout (integers big-endian):
/// - `[u8; 4]`: symbol (bytes 0-3)
/// - `u8`: side (byte 4)
/// - `i32`: quantity (bytes 5-8)
/// - `i32`: price (bytes 9-12)
/// - `i32`: sequence (bytes 13-16)
///
/// Every 17-byte input decodes; symbol and side bytes are carried over
/// unchanged even when they are not valid ASCII.
#[inline]
#[must_use]
pub fn decode_record(data: &[u8; TickerRecord::SIZE]) -> TickerRecord {
    TickerRecord::new(
        BigEndian::read_i32(&data[13..17]),
        Symbol::new([data[0], data[1], data[2], data[3]]),
        Side::from_byte(data[4]),
        BigEndian::read_i32(&data[5..9]),
        BigEndian::read_i32(&data[9..13]),
    )
}

/// Decodes a buffer holding whole records back to back.
///
/// # Errors
///
/// Returns an error if the buffer length is not a multiple of the record size.
pub fn decode_records(data: &[u8]) -> Result<impl Iterator<Item = TickerRecord> + '_, DecodeError> {
    let (chunks, rest) = data.as_chunks::<{ TickerRecord::SIZE }>();
    if !rest.is_empty() {
        return Err(DecodeError::InvalidLength(data.len(), TickerRecord::SIZE));
    }

    Ok(chunks.iter().map(decode_record))
}

/// Returns the number of whole records in a buffer of the given length.
#[must_use]
pub const fn record_count(data_len: usize) -> usize {
    data_len / TickerRecord::SIZE
}
