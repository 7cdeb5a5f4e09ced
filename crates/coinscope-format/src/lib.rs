//! Export formatters for coinscope market data.
//!
//! This crate writes market listings and historical charts to:
//!
//! - [`CsvFormatter`] - CSV or TSV
//! - [`JsonFormatter`] - JSON array or NDJSON

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/coinscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod csv;
mod formatter;
mod json;

pub use crate::csv::CsvFormatter;
pub use formatter::{FormatError, Formatter, OutputFormat, formatter_for};
pub use json::{JsonFormatter, JsonStyle};
