//! Ticker record representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced when building wire fields from text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// Symbol text does not map to exactly four bytes.
    #[error("Invalid symbol: {0:?} (expected 4 single-byte characters)")]
    InvalidSymbol(String),

    /// Side text does not map to exactly one byte.
    #[error("Invalid side: {0:?} (expected 1 single-byte character)")]
    InvalidSide(String),
}

/// Maps text back to wire bytes, one byte per `char` up to U+00FF.
fn text_to_bytes(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|c| u8::try_from(c).ok()).collect()
}

/// Four-byte ticker code, kept exactly as received.
///
/// The protocol defines the field as fixed-width ASCII without a terminator.
/// Bytes outside the ASCII range are not rejected; they are displayed as the
/// `char` with the same code point so the value stays lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Symbol([u8; 4]);

impl Symbol {
    /// Width of the symbol field in bytes.
    pub const LEN: usize = 4;

    /// Creates a symbol from raw wire bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// Returns the raw wire bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Returns true if every byte is ASCII.
    #[must_use]
    pub const fn is_ascii(&self) -> bool {
        self.0.is_ascii()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Symbol {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        text_to_bytes(s)
            .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
            .map(Self)
            .ok_or_else(|| FieldError::InvalidSymbol(s.to_string()))
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_string()
    }
}

impl TryFrom<String> for Symbol {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Order side.
///
/// Only `B` and `S` are valid on the wire, but any other byte is carried as
/// [`Side::Other`] instead of being rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Side {
    /// `B`
    Buy,
    /// `S`
    Sell,
    /// Any unrecognized byte.
    Other(u8),
}

impl Side {
    /// Maps a wire byte to a side.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            b'B' => Self::Buy,
            b'S' => Self::Sell,
            other => Self::Other(other),
        }
    }

    /// Returns the wire byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Buy => b'B',
            Self::Sell => b'S',
            Self::Other(b) => b,
        }
    }

    /// Returns the wire byte as a character.
    #[must_use]
    pub const fn as_char(self) -> char {
        self.as_byte() as char
    }

    /// Returns true for `B` and `S`.
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl std::str::FromStr for Side {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match text_to_bytes(s).as_deref() {
            Some(&[b]) => Ok(Self::from_byte(b)),
            _ => Err(FieldError::InvalidSide(s.to_string())),
        }
    }
}

impl From<Side> for String {
    fn from(side: Side) -> Self {
        side.to_string()
    }
}

impl TryFrom<String> for Side {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single decoded ticker packet.
///
/// The wire format stores a record as 17 bytes:
/// - `[u8; 4]`: symbol (bytes 0-3)
/// - `u8`: side (byte 4)
/// - `i32`: quantity, big-endian (bytes 5-8)
/// - `i32`: price, big-endian (bytes 9-12)
/// - `i32`: sequence, big-endian (bytes 13-16)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerRecord {
    /// Server-assigned sequence number, unique within a session.
    pub sequence: i32,
    /// Ticker code.
    pub symbol: Symbol,
    /// Buy or sell.
    pub side: Side,
    /// Order quantity.
    pub quantity: i32,
    /// Price as an opaque fixed-point integer.
    pub price: i32,
}

impl TickerRecord {
    /// Size in bytes of a record on the wire.
    pub const SIZE: usize = 17;

    /// Creates a new ticker record.
    #[must_use]
    pub const fn new(sequence: i32, symbol: Symbol, side: Side, quantity: i32, price: i32) -> Self {
        Self {
            sequence,
            symbol,
            side,
            quantity,
            price,
        }
    }
}

impl fmt::Display for TickerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Seq {}: {} {} {} @ {}",
            self.sequence, self.symbol, self.side, self.quantity, self.price
        )
    }
}
