//! Client library for the ABX binary market-data protocol.
//!
//! This is a facade crate that re-exports functionality from the abx
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```no_run
//! use abx_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = AbxClient::new(ClientConfig::new("localhost", 3000));
//!     let outcome = fetch_records(&client, &RecoveryConfig::default(), |_| {}).await?;
//!
//!     for record in &outcome.records {
//!         println!("{record}");
//!     }
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use abx_types::*;

#[cfg(feature = "fetch")]
pub use abx_fetch::{
    AbxClient, ClientConfig, ClientError, DecodeError, FetchOutcome, RecoveryConfig,
    RecoveryReport, Request, RequestError, ResendSource, StreamSummary, UnrequestableGaps,
    decode_record, decode_records, fetch_records, fill_gaps, record_count,
};

#[cfg(feature = "format")]
pub use abx_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat, write_to_file,
};

#[cfg(feature = "server")]
pub use abx_server::{ApiError, AppState, ServerConfig, create_router, serve, serve_on};

/// Prelude module for convenient imports.
///
/// ```
/// use abx_lib::prelude::*;
/// ```
pub mod prelude {
    pub use abx_types::{AbxError, RecordSet, Result, Side, Symbol, TickerRecord};

    #[cfg(feature = "fetch")]
    pub use abx_fetch::{AbxClient, ClientConfig, RecoveryConfig, fetch_records, fill_gaps};

    #[cfg(feature = "format")]
    pub use abx_format::{Formatter, OutputFormat, write_to_file};

    #[cfg(feature = "server")]
    pub use abx_server::{ServerConfig, serve};
}
