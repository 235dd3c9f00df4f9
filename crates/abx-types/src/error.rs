//! Error types for the ABX client.

use thiserror::Error;

/// Result type alias for ABX operations.
pub type Result<T> = std::result::Result<T, AbxError>;

/// Errors that can occur while fetching, recovering and exporting records.
#[derive(Error, Debug)]
pub enum AbxError {
    /// The ABX server could not be reached or dropped the connection.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server sent data that does not match the wire protocol.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// A request could not be encoded.
    #[error("Invalid request: {0}")]
    Request(String),

    /// Output format error.
    #[error("Format error: {0}")]
    Format(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AbxError {
    /// Returns true if the error was caused by the transport to the ABX server.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}
