//! Single-request lookups: daily snapshot, recent chart, current prices.

use chrono::NaiveDate;
use coinscope_types::{DailySnapshot, InputError, MarketChart, Result, SimplePrice};
use tracing::warn;

use crate::chunks::ChartQuery;
use crate::schema::{HistoryResponse, MarketChartResponse, SimplePriceResponse};
use crate::{ApiClient, RequestDescriptor, Transport};

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`InputError::InvalidDate`] if the text is not a valid date.
pub fn parse_date(text: &str) -> std::result::Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| InputError::InvalidDate(text.to_string()))
}

/// Formats a date in the `DD-MM-YYYY` form the history endpoint expects.
#[must_use]
pub fn api_date(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

/// Fetches a coin's market data on one past date.
///
/// `date` is given as `YYYY-MM-DD` and validated before any request.
///
/// # Errors
///
/// Returns [`InputError::InvalidDate`] for a malformed date,
/// [`InputError::EmptyResult`] if the API has no market data for that date,
/// or the classified failure of the request.
pub async fn fetch_snapshot<T: Transport>(
    client: &ApiClient<T>,
    id: &str,
    date: &str,
    vs_currency: &str,
) -> Result<DailySnapshot> {
    let date = parse_date(date)?;
    let request = RequestDescriptor::new(format!("/coins/{id}/history"))
        .param("date", api_date(date))
        .param("localization", false);

    let response: HistoryResponse = client.execute_as(&request).await?;
    let Some(market_data) = response.market_data else {
        return Err(InputError::EmptyResult(format!("{id} on {date}")).into());
    };

    let vs = vs_currency.to_lowercase();
    let pick = |values: &std::collections::HashMap<String, Option<f64>>| {
        values.get(&vs).copied().flatten()
    };

    let snapshot = DailySnapshot {
        price: pick(&market_data.current_price),
        market_cap: pick(&market_data.market_cap),
        volume: pick(&market_data.total_volume),
        id: response.id,
        name: response.name,
        symbol: response.symbol,
        date,
        vs_currency: vs,
    };

    if snapshot.is_empty() {
        return Err(InputError::EmptyResult(format!(
            "{id} on {date} in {}",
            snapshot.vs_currency
        ))
        .into());
    }
    Ok(snapshot)
}

/// Fetches the last `days` days of a coin's chart.
///
/// Granularity is chosen by the API: hourly for one day, daily beyond.
///
/// # Errors
///
/// Returns [`InputError::NonPositiveDays`] if `days < 1`,
/// [`InputError::EmptyResult`] for an empty chart, or the classified failure
/// of the request.
pub async fn fetch_recent<T: Transport>(
    client: &ApiClient<T>,
    id: &str,
    days: i64,
    query: &ChartQuery,
) -> Result<MarketChart> {
    if days < 1 {
        return Err(InputError::NonPositiveDays(days).into());
    }

    let chart: MarketChart = client
        .execute_as::<MarketChartResponse>(&query.days_request(id, days))
        .await?
        .into();

    if chart.is_empty() {
        return Err(InputError::EmptyResult(format!("{id} over the last {days} days")).into());
    }
    Ok(chart)
}

/// Fetches current prices for coin ids in one request.
///
/// Results follow the order of `ids`; ids the API does not know are skipped
/// with a warning.
///
/// # Errors
///
/// Returns [`InputError::EmptyResult`] if no id is known, or the classified
/// failure of the request.
pub async fn fetch_simple_prices<T: Transport>(
    client: &ApiClient<T>,
    ids: &[String],
    vs_currency: &str,
) -> Result<Vec<SimplePrice>> {
    let vs = vs_currency.to_lowercase();
    let request = RequestDescriptor::new("/simple/price")
        .param("ids", ids.join(","))
        .param("vs_currencies", &vs)
        .param("include_market_cap", true)
        .param("include_24hr_vol", true)
        .param("include_24hr_change", true);

    let response: SimplePriceResponse = client.execute_as(&request).await?;

    let mut prices = Vec::with_capacity(ids.len());
    for id in ids {
        let Some(fields) = response.get(id) else {
            warn!(id = %id, "no price returned for coin, skipping");
            continue;
        };
        let field = |suffix: &str| fields.get(&format!("{vs}{suffix}")).copied().flatten();
        prices.push(SimplePrice {
            id: id.clone(),
            vs_currency: vs.clone(),
            price: field(""),
            market_cap: field("_market_cap"),
            volume_24h: field("_24h_vol"),
            change_24h: field("_24h_change"),
        });
    }

    if prices.is_empty() {
        return Err(InputError::EmptyResult(format!("prices for {}", ids.join(", "))).into());
    }
    Ok(prices)
}
