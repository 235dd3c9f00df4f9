//! Protocol client for the ABX binary market-data stream.
//!
//! This crate provides the fetch pipeline:
//!
//! - [`Request`] - 2-byte request encoding
//! - [`decode_record`] - 17-byte packet decoding
//! - [`AbxClient`] - TCP client for the stream session and single resends
//! - [`fill_gaps`] - Pass-based recovery of missing sequence numbers
//! - [`fetch_records`] - Stream session followed by gap recovery

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod client;
mod decode;
mod pipeline;
mod recovery;
mod request;
mod session;

pub use client::{AbxClient, ClientConfig, ClientError};
pub use decode::{DecodeError, decode_record, decode_records, record_count};
pub use pipeline::{FetchOutcome, fetch_records};
pub use recovery::{RecoveryConfig, RecoveryReport, ResendSource, UnrequestableGaps, fill_gaps};
pub use request::{Request, RequestError};
pub use session::StreamSummary;
