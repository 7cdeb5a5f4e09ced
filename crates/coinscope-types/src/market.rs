//! Market listing, search, and snapshot records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One coin's snapshot from a market listing.
///
/// Entries from successive pages are concatenated as received, never merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEntry {
    /// Canonical coin identifier (e.g., "bitcoin").
    pub id: String,
    /// Display name (e.g., "Bitcoin").
    pub name: String,
    /// Ticker symbol (e.g., "btc").
    pub symbol: String,
    /// Market-cap rank.
    pub rank: Option<u32>,
    /// Current price in the quote currency.
    pub price: Option<f64>,
    /// 24h price change, percent.
    pub change_24h: Option<f64>,
    /// Market capitalization in the quote currency.
    pub market_cap: Option<f64>,
    /// 24h traded volume in the quote currency.
    pub volume: Option<f64>,
}

impl MarketEntry {
    /// Creates an entry with only identifying fields set.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            rank: None,
            price: None,
            change_24h: None,
            market_cap: None,
            volume: None,
        }
    }
}

/// A candidate coin returned by a free-text search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    /// Canonical coin identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// Market-cap rank, if ranked.
    pub rank: Option<u32>,
}

impl SearchCandidate {
    /// Returns true if this candidate's symbol equals `symbol`, ignoring case.
    #[must_use]
    pub fn matches_symbol(&self, symbol: &str) -> bool {
        self.symbol.eq_ignore_ascii_case(symbol.trim())
    }
}

/// Current price data for one coin in one quote currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimplePrice {
    /// Canonical coin identifier.
    pub id: String,
    /// Quote currency code.
    pub vs_currency: String,
    /// Current price.
    pub price: Option<f64>,
    /// Market capitalization.
    pub market_cap: Option<f64>,
    /// 24h traded volume.
    pub volume_24h: Option<f64>,
    /// 24h price change, percent.
    pub change_24h: Option<f64>,
}

/// A coin's market data on a single past date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    /// Canonical coin identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ticker symbol.
    pub symbol: String,
    /// The requested date.
    pub date: NaiveDate,
    /// Quote currency code.
    pub vs_currency: String,
    /// Price on that date.
    pub price: Option<f64>,
    /// Market capitalization on that date.
    pub market_cap: Option<f64>,
    /// Traded volume on that date.
    pub volume: Option<f64>,
}

impl DailySnapshot {
    /// Returns true if the API had no market data for the date.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.price.is_none() && self.market_cap.is_none() && self.volume.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_symbol_case_insensitive() {
        let candidate = SearchCandidate {
            id: "bitcoin".to_string(),
            name: "Bitcoin".to_string(),
            symbol: "BTC".to_string(),
            rank: Some(1),
        };
        assert!(candidate.matches_symbol("btc"));
        assert!(candidate.matches_symbol("BTC"));
        assert!(candidate.matches_symbol(" Btc "));
        assert!(!candidate.matches_symbol("wbtc"));
    }

    #[test]
    fn test_market_entry_new() {
        let entry = MarketEntry::new("ethereum", "Ethereum", "eth");
        assert_eq!(entry.id, "ethereum");
        assert!(entry.price.is_none());
    }
}
