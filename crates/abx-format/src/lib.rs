//! Output formatters for ABX record sets.
//!
//! This crate provides formatters for writing a record set:
//!
//! - [`JsonFormatter`] - JSON array or NDJSON format
//! - [`CsvFormatter`] - CSV format

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat, write_to_file};
pub use json::{JsonFormatter, JsonStyle};
