//! Core types for the ABX market-data client.
//!
//! This crate provides the fundamental data structures used throughout the workspace:
//!
//! - [`TickerRecord`] - A single decoded ticker packet
//! - [`Symbol`] - Four-byte ticker code as it appears on the wire
//! - [`Side`] - Buy/sell indicator, passing unknown bytes through
//! - [`RecordSet`] - Sequence-keyed record collection with gap detection

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod record;
mod record_set;

pub use error::{AbxError, Result};
pub use record::{FieldError, Side, Symbol, TickerRecord};
pub use record_set::RecordSet;
