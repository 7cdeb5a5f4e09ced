//! Core types for the coinscope market data fetcher.
//!
//! This crate provides the fundamental data structures used throughout coinscope:
//!
//! - [`Tier`] - Account tier selecting the API host and auth header
//! - [`Credentials`] - API key and tier borrowed by each request
//! - [`Endpoint`] - Resolved base address and auth header name
//! - [`MarketEntry`] - One coin's snapshot from a market listing
//! - [`MarketChart`] - Three index-aligned historical series
//! - [`ChunkWindow`] - Bounded sub-range of a historical query
//! - [`Error`] - Classified failure returned by every fetch

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/coinscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod market;
mod series;
mod tier;

pub use error::{Error, InputError, Result};
pub use market::{DailySnapshot, MarketEntry, SearchCandidate, SimplePrice};
pub use series::{ChartRow, ChunkWindow, MarketChart, SECONDS_PER_DAY, TimeSeriesPoint};
pub use tier::{Credentials, Endpoint, Tier, TierParseError};
