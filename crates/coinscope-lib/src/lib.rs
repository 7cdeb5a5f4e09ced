//! Rust library for fetching cryptocurrency market data.
//!
//! This is a facade crate that re-exports functionality from the coinscope
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use coinscope_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = CredentialStore::with_default_path()?.load_with_env()?;
//!     let client = ApiClient::with_defaults(credentials)?;
//!
//!     let ids = resolve_symbols(&client, &["btc", "eth"]).await?;
//!     for price in fetch_simple_prices(&client, &ids, "usd").await? {
//!         println!("{}: {:?}", price.id, price.price);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/coinscope/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use coinscope_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use coinscope_fetch::{
    ApiClient, ChartQuery, ClientConfig, HttpRequest, HttpResponse, MAX_PER_PAGE,
    MAX_WINDOW_DAYS, MarketsQuery, PageProgress, ReqwestTransport, RequestDescriptor, Transport,
    TransportError, WindowProgress, api_date, fetch_markets, fetch_markets_paged, fetch_range,
    fetch_range_chunked, fetch_recent, fetch_simple_prices, fetch_snapshot, parse_date,
    plan_windows, resolve_symbol, resolve_symbols, search,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use coinscope_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat, formatter_for,
};

// Re-export credential storage
#[cfg(feature = "credentials")]
pub use coinscope_credentials::{API_KEY_ENV, CredentialStore, StoreError, TIER_ENV};

/// Prelude module for convenient imports.
///
/// ```
/// use coinscope_lib::prelude::*;
/// ```
pub mod prelude {
    pub use coinscope_types::{
        ChunkWindow, Credentials, DailySnapshot, Endpoint, Error, InputError, MarketChart,
        MarketEntry, Result, SearchCandidate, SimplePrice, Tier, TimeSeriesPoint,
    };

    #[cfg(feature = "fetch")]
    pub use coinscope_fetch::{
        ApiClient, ChartQuery, ClientConfig, MarketsQuery, PageProgress, WindowProgress,
        fetch_markets, fetch_markets_paged, fetch_range, fetch_range_chunked, fetch_recent,
        fetch_simple_prices, fetch_snapshot, resolve_symbols, search,
    };

    #[cfg(feature = "format")]
    pub use coinscope_format::{CsvFormatter, Formatter, JsonFormatter, OutputFormat};

    #[cfg(feature = "credentials")]
    pub use coinscope_credentials::CredentialStore;
}
