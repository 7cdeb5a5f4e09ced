//! Response payload schemas, one per endpoint.
//!
//! Every field the API documents as optional or nullable is optional here.

use std::collections::HashMap;

use coinscope_types::{MarketChart, MarketEntry, SearchCandidate, TimeSeriesPoint};
use serde::Deserialize;

/// Item of `GET /coins/markets`.
#[derive(Debug, Deserialize)]
pub(crate) struct MarketItem {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) symbol: String,
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) market_cap_rank: Option<u32>,
    pub(crate) current_price: Option<f64>,
    pub(crate) price_change_percentage_24h: Option<f64>,
    pub(crate) market_cap: Option<f64>,
    pub(crate) total_volume: Option<f64>,
}

impl From<MarketItem> for MarketEntry {
    fn from(item: MarketItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            symbol: item.symbol,
            rank: item.market_cap_rank,
            price: item.current_price,
            change_24h: item.price_change_percentage_24h,
            market_cap: item.market_cap,
            volume: item.total_volume,
        }
    }
}

/// Body of `GET /search`.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub(crate) coins: Option<Vec<SearchCoin>>,
}

/// Coin candidate inside [`SearchResponse`].
#[derive(Debug, Deserialize)]
pub(crate) struct SearchCoin {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) symbol: String,
    pub(crate) market_cap_rank: Option<u32>,
}

impl From<SearchCoin> for SearchCandidate {
    fn from(coin: SearchCoin) -> Self {
        Self {
            id: coin.id,
            name: coin.name,
            symbol: coin.symbol,
            rank: coin.market_cap_rank,
        }
    }
}

/// Body of `GET /coins/{id}/market_chart` and `.../market_chart/range`.
#[derive(Debug, Deserialize)]
pub(crate) struct MarketChartResponse {
    #[serde(default)]
    pub(crate) prices: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    pub(crate) market_caps: Option<Vec<(f64, f64)>>,
    #[serde(default)]
    pub(crate) total_volumes: Option<Vec<(f64, f64)>>,
}

impl From<MarketChartResponse> for MarketChart {
    fn from(response: MarketChartResponse) -> Self {
        let points = |series: Option<Vec<(f64, f64)>>| -> Vec<TimeSeriesPoint> {
            series
                .unwrap_or_default()
                .into_iter()
                .map(TimeSeriesPoint::from)
                .collect()
        };
        Self {
            prices: points(response.prices),
            market_caps: points(response.market_caps),
            total_volumes: points(response.total_volumes),
        }
    }
}

/// Body of `GET /coins/{id}/history`.
#[derive(Debug, Deserialize)]
pub(crate) struct HistoryResponse {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) symbol: String,
    #[serde(default)]
    pub(crate) name: String,
    pub(crate) market_data: Option<HistoryMarketData>,
}

/// Per-currency values inside [`HistoryResponse`].
#[derive(Debug, Deserialize)]
pub(crate) struct HistoryMarketData {
    #[serde(default)]
    pub(crate) current_price: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub(crate) market_cap: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub(crate) total_volume: HashMap<String, Option<f64>>,
}

/// Body of `GET /simple/price`: coin id to field name to value.
pub(crate) type SimplePriceResponse = HashMap<String, HashMap<String, Option<f64>>>;

/// Body of `GET /ping`.
#[derive(Debug, Deserialize)]
pub(crate) struct PingResponse {
    pub(crate) gecko_says: Option<String>,
}

/// Error body returned with non-2xx statuses.
///
/// The API reports errors in several shapes: `{"error": ".."}`,
/// `{"error_message": ".."}`, or `{"status": {"error_message": ".."}}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    error: Option<String>,
    error_message: Option<String>,
    status: Option<ApiErrorStatus>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorStatus {
    error_message: Option<String>,
}

impl ApiErrorBody {
    /// Extracts the API's own error message from a response body.
    pub(crate) fn message(body: &str) -> Option<String> {
        let parsed: Self = serde_json::from_str(body).ok()?;
        parsed
            .error
            .or(parsed.error_message)
            .or_else(|| parsed.status.and_then(|s| s.error_message))
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}
