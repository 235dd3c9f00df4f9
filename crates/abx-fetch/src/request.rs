//! Client request encoding.

use std::ops::RangeInclusive;
use thiserror::Error;

/// Errors that can occur while building a request.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// The resend field is one unsigned byte wide.
    #[error("Sequence {0} cannot be requested (resend field holds 0-255)")]
    SequenceOutOfRange(i32),
}

/// A request sent by the client at the start of a connection.
///
/// On the wire a request is 2 bytes: the call type followed by the sequence
/// number to resend (ignored for [`Request::StreamAll`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    /// Stream every packet currently available, then close.
    StreamAll,
    /// Resend the packet with the given sequence number.
    Resend(u8),
}

impl Request {
    /// Size in bytes of an encoded request.
    pub const SIZE: usize = 2;

    /// Creates a resend request, checking the sequence fits the wire field.
    ///
    /// # Errors
    ///
    /// Returns an error if `sequence` is outside `0..=255`.
    pub fn resend(sequence: i32) -> Result<Self, RequestError> {
        u8::try_from(sequence)
            .map(Self::Resend)
            .map_err(|_| RequestError::SequenceOutOfRange(sequence))
    }

    /// Returns true if a resend request can express the sequence number.
    #[must_use]
    pub const fn can_resend(sequence: i32) -> bool {
        0 <= sequence && sequence <= u8::MAX as i32
    }

    /// Returns the sequence numbers a resend request can express.
    #[must_use]
    pub const fn resend_range() -> RangeInclusive<i32> {
        0..=u8::MAX as i32
    }

    /// Returns the call type discriminator.
    #[must_use]
    pub const fn call_type(&self) -> u8 {
        match self {
            Self::StreamAll => 1,
            Self::Resend(_) => 2,
        }
    }

    /// Encodes the request for the wire.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; Self::SIZE] {
        match *self {
            Self::StreamAll => [self.call_type(), 0],
            Self::Resend(sequence) => [self.call_type(), sequence],
        }
    }
}
