//! Historical range stitching.
//!
//! The range endpoint returns consistent granularity only for spans up to
//! [`MAX_WINDOW_DAYS`]. Longer ranges are split into sequential windows whose
//! series are concatenated in window order.

use coinscope_types::{ChunkWindow, InputError, MarketChart, Result, SECONDS_PER_DAY};
use tracing::{debug, info};

use crate::schema::MarketChartResponse;
use crate::{ApiClient, RequestDescriptor, Transport};

/// Maximum span of one range request, in days.
pub const MAX_WINDOW_DAYS: i64 = 90;

/// Parameters of a chart request, besides the coin and the time bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartQuery {
    /// Quote currency (e.g., "usd").
    pub vs_currency: String,
    /// Decimal places for values, or "full".
    pub precision: Option<String>,
}

impl Default for ChartQuery {
    fn default() -> Self {
        Self::new("usd")
    }
}

impl ChartQuery {
    /// Creates a query for the given quote currency.
    #[must_use]
    pub fn new(vs_currency: impl Into<String>) -> Self {
        Self {
            vs_currency: vs_currency.into(),
            precision: None,
        }
    }

    /// Builds the range request for one window.
    #[must_use]
    pub fn range_request(&self, id: &str, window: ChunkWindow) -> RequestDescriptor {
        RequestDescriptor::new(format!("/coins/{id}/market_chart/range"))
            .param("vs_currency", &self.vs_currency)
            .param("from", window.from)
            .param("to", window.to)
            .param_opt("precision", self.precision.as_deref())
    }

    /// Builds the relative "last N days" request.
    #[must_use]
    pub fn days_request(&self, id: &str, days: i64) -> RequestDescriptor {
        RequestDescriptor::new(format!("/coins/{id}/market_chart"))
            .param("vs_currency", &self.vs_currency)
            .param("days", days)
            .param_opt("precision", self.precision.as_deref())
    }
}

/// Progress after one window of a stitched fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowProgress {
    /// Index of the window just fetched, starting at 0.
    pub index: usize,
    /// Number of planned windows.
    pub count: usize,
    /// The window just fetched.
    pub window: ChunkWindow,
    /// Price points received for this window.
    pub points: usize,
}

/// Splits `[from, to]` into windows of at most `max_window_days`.
///
/// A range within one window yields `[from, to]` unchanged. Otherwise each
/// window ends `max_window_days` after its start (or at `to`) and the next
/// starts one second later. When that leaves only the final second `to`
/// uncovered, the last window is extended to end at `to`.
///
/// # Errors
///
/// Returns [`InputError::InvalidRange`] unless `from < to`.
pub fn plan_windows(
    from: i64,
    to: i64,
    max_window_days: i64,
) -> std::result::Result<Vec<ChunkWindow>, InputError> {
    if from >= to {
        return Err(InputError::InvalidRange { from, to });
    }

    let span = max_window_days.max(1).saturating_mul(SECONDS_PER_DAY);
    if to.saturating_sub(from) <= span {
        return Ok(vec![ChunkWindow::new(from, to)]);
    }

    let mut windows: Vec<ChunkWindow> = Vec::new();
    let mut chunk_from = from;
    while chunk_from < to {
        let chunk_to = chunk_from.saturating_add(span).min(to);
        windows.push(ChunkWindow::new(chunk_from, chunk_to));
        chunk_from = chunk_to + 1;
    }

    if let Some(last) = windows.last_mut() {
        last.to = to;
    }
    Ok(windows)
}

/// Fetches `[from, to]` for a coin, stitching [`MAX_WINDOW_DAYS`] windows.
///
/// # Errors
///
/// See [`fetch_range_chunked`].
pub async fn fetch_range<T: Transport>(
    client: &ApiClient<T>,
    id: &str,
    from: i64,
    to: i64,
    query: &ChartQuery,
) -> Result<MarketChart> {
    fetch_range_chunked(client, id, from, to, MAX_WINDOW_DAYS, query, |_| {}).await
}

/// Fetches `[from, to]` for a coin with one sequential request per window.
///
/// # Errors
///
/// Returns [`InputError::InvalidRange`] before any request unless
/// `from < to`; the classified failure of the first failing window, discarding
/// windows already fetched; or [`InputError::EmptyResult`] if every window
/// came back empty.
pub async fn fetch_range_chunked<T: Transport>(
    client: &ApiClient<T>,
    id: &str,
    from: i64,
    to: i64,
    max_window_days: i64,
    query: &ChartQuery,
    mut on_window: impl FnMut(WindowProgress),
) -> Result<MarketChart> {
    let windows = plan_windows(from, to, max_window_days)?;
    let count = windows.len();
    debug!(id, from, to, count, "planned range windows");

    let mut chart = MarketChart::new();
    for (index, window) in windows.into_iter().enumerate() {
        let request = query.range_request(id, window);
        let part: MarketChart = client
            .execute_as::<MarketChartResponse>(&request)
            .await?
            .into();

        let points = part.prices.len();
        info!(id, window = %window, index, count, points, "fetched range window");
        on_window(WindowProgress {
            index,
            count,
            window,
            points,
        });
        chart.append(part);
    }

    if chart.is_empty() {
        return Err(InputError::EmptyResult(format!("{id} between {from} and {to}")).into());
    }
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockTransport, client, ok_json, status};
    use coinscope_types::Error;
    use serde_json::json;

    const FROM: i64 = 1_704_067_200; // 2024-01-01T00:00:00Z
    const DAY: i64 = SECONDS_PER_DAY;

    /// Answers each window with two points at its bounds.
    fn echo_windows() -> MockTransport {
        MockTransport::new(|request| {
            let from: i64 = request.query_value("from").unwrap().parse().unwrap();
            let to: i64 = request.query_value("to").unwrap().parse().unwrap();
            let series = json!([[from * 1000, from], [to * 1000, to]]);
            ok_json(json!({
                "prices": series,
                "market_caps": series,
                "total_volumes": series,
            }))
        })
    }

    #[test]
    fn test_plan_200_days_three_windows() {
        let to = FROM + 200 * DAY;
        let windows = plan_windows(FROM, to, 90).unwrap();

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0], ChunkWindow::new(FROM, FROM + 90 * DAY));
        assert_eq!(windows[0].span_seconds(), 90 * DAY);
        assert_eq!(windows[1].span_seconds(), 90 * DAY);
        assert!(windows[2].span_seconds() < 90 * DAY);

        assert_eq!(windows.first().unwrap().from, FROM);
        assert_eq!(windows.last().unwrap().to, to);
        for pair in windows.windows(2) {
            assert_eq!(pair[1].from, pair[0].to + 1, "gap or overlap between windows");
        }
    }

    #[test]
    fn test_plan_window_count_is_ceil_of_days() {
        for days in [91, 180, 181, 365, 1000] {
            let windows = plan_windows(FROM, FROM + days * DAY, 90).unwrap();
            assert_eq!(windows.len() as i64, (days + 89) / 90, "days={days}");
        }
    }

    #[test]
    fn test_plan_single_window_shortcut() {
        let windows = plan_windows(FROM, FROM + 90 * DAY, 90).unwrap();
        assert_eq!(windows, vec![ChunkWindow::new(FROM, FROM + 90 * DAY)]);
    }

    #[test]
    fn test_plan_covers_trailing_second() {
        let windows = plan_windows(FROM, FROM + 90 * DAY + 1, 90).unwrap();
        assert_eq!(windows, vec![ChunkWindow::new(FROM, FROM + 90 * DAY + 1)]);

        let to = FROM + 180 * DAY + 2;
        let windows = plan_windows(FROM, to, 90).unwrap();
        assert_eq!(windows.len(), 2);
        assert_eq!(windows[1].from, windows[0].to + 1);
        assert_eq!(windows.last().unwrap().to, to);
    }

    #[test]
    fn test_plan_rejects_inverted_range() {
        assert_eq!(
            plan_windows(FROM, FROM, 90),
            Err(InputError::InvalidRange { from: FROM, to: FROM })
        );
        assert!(plan_windows(FROM + 1, FROM, 90).is_err());
    }

    #[tokio::test]
    async fn test_short_range_issues_one_request() {
        let client = client(echo_windows());
        let chart = fetch_range(&client, "bitcoin", FROM, FROM + 30 * DAY, &ChartQuery::default())
            .await
            .unwrap();

        let requests = client.transport().requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.ends_with("/coins/bitcoin/market_chart/range"));
        assert_eq!(requests[0].query_value("from"), Some("1704067200"));
        assert_eq!(requests[0].query_value("vs_currency"), Some("usd"));
        assert_eq!(chart.prices.len(), 2);
    }

    #[tokio::test]
    async fn test_stitched_series_follow_window_order() {
        let client = client(echo_windows());
        let mut progress = Vec::new();
        let chart = fetch_range_chunked(
            &client,
            "bitcoin",
            FROM,
            FROM + 200 * DAY,
            90,
            &ChartQuery::default(),
            |p| progress.push(p),
        )
        .await
        .unwrap();

        assert_eq!(client.transport().requests().len(), 3);
        assert_eq!(progress.len(), 3);
        assert_eq!(progress[2].index, 2);
        assert_eq!(progress[2].count, 3);

        for series in [&chart.prices, &chart.market_caps, &chart.total_volumes] {
            assert_eq!(series.len(), 6);
            let timestamps: Vec<i64> = series.iter().map(|p| p.timestamp_ms).collect();
            assert!(timestamps.windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(chart.prices[0].timestamp_ms, FROM * 1000);
        assert_eq!(chart.prices[5].timestamp_ms, (FROM + 200 * DAY) * 1000);
    }

    #[tokio::test]
    async fn test_invalid_range_sends_nothing() {
        let client = client(echo_windows());
        let result = fetch_range(&client, "bitcoin", FROM, FROM - 1, &ChartQuery::default()).await;
        assert!(matches!(
            result,
            Err(Error::Input(InputError::InvalidRange { .. }))
        ));
        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_mid_sequence_failure_discards_windows() {
        let window = json!({"prices": [[1, 1.0]], "market_caps": [[1, 1.0]], "total_volumes": [[1, 1.0]]});
        let client = client(MockTransport::scripted(vec![
            ok_json(window.clone()),
            ok_json(window),
            status(429, ""),
        ]));

        let result = fetch_range(
            &client,
            "bitcoin",
            FROM,
            FROM + 365 * DAY,
            &ChartQuery::default(),
        )
        .await;

        assert!(matches!(result, Err(Error::RateLimited)));
        assert_eq!(client.transport().requests().len(), 3);
    }

    #[tokio::test]
    async fn test_all_windows_empty() {
        let client = client(MockTransport::new(|_| {
            ok_json(json!({"prices": [], "market_caps": [], "total_volumes": []}))
        }));
        let result = fetch_range(&client, "bitcoin", FROM, FROM + DAY, &ChartQuery::default()).await;
        assert!(matches!(
            result,
            Err(Error::Input(InputError::EmptyResult(_)))
        ));
    }

    #[test]
    fn test_days_request() {
        let query = ChartQuery {
            precision: Some("full".to_string()),
            ..ChartQuery::new("eur")
        };
        let request = query.days_request("ethereum", 7);
        assert_eq!(request.path(), "/coins/ethereum/market_chart");
        assert_eq!(
            request.query(),
            &[
                ("vs_currency".to_string(), "eur".to_string()),
                ("days".to_string(), "7".to_string()),
                ("precision".to_string(), "full".to_string()),
            ]
        );
    }
}
