//! Request routing, pagination, and range stitching for coinscope.
//!
//! This crate provides the data retrieval pipeline:
//!
//! - [`ApiClient`] - Routes by tier, attaches credentials, classifies failures
//! - [`Transport`] / [`ReqwestTransport`] - The HTTP seam beneath the client
//! - [`resolve_symbols`] - Ticker symbols to coin identifiers
//! - [`fetch_markets`] - Market listings larger than one page
//! - [`fetch_range`] - Historical ranges longer than one window
//! - [`fetch_snapshot`] / [`fetch_recent`] - Single-request history lookups

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/coinscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod chunks;
mod client;
mod lookups;
mod pages;
mod schema;
mod symbols;
mod transport;

#[cfg(test)]
mod testing;

pub use chunks::{
    ChartQuery, MAX_WINDOW_DAYS, WindowProgress, fetch_range, fetch_range_chunked, plan_windows,
};
pub use client::{ApiClient, RequestDescriptor};
pub use lookups::{api_date, fetch_recent, fetch_simple_prices, fetch_snapshot, parse_date};
pub use pages::{MAX_PER_PAGE, MarketsQuery, PageProgress, fetch_markets, fetch_markets_paged};
pub use symbols::{resolve_symbol, resolve_symbols, search};
pub use transport::{
    ClientConfig, HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError,
};
