//! Historical time series and chunk windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// A single `(timestamp, value)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    /// Observation time, milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
    /// Observed value.
    pub value: f64,
}

impl TimeSeriesPoint {
    /// Creates a new point.
    #[must_use]
    pub const fn new(timestamp_ms: i64, value: f64) -> Self {
        Self {
            timestamp_ms,
            value,
        }
    }

    /// Returns the observation time as a UTC datetime.
    #[must_use]
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }
}

impl From<(f64, f64)> for TimeSeriesPoint {
    fn from((timestamp_ms, value): (f64, f64)) -> Self {
        Self::new(timestamp_ms as i64, value)
    }
}

/// Three parallel historical series for one coin.
///
/// The series are aligned by index, not by timestamp equality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChart {
    /// Price series.
    pub prices: Vec<TimeSeriesPoint>,
    /// Market capitalization series.
    pub market_caps: Vec<TimeSeriesPoint>,
    /// Total traded volume series.
    pub total_volumes: Vec<TimeSeriesPoint>,
}

/// One index-aligned row across the three series of a [`MarketChart`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartRow {
    /// Row timestamp, taken from the first series that has this index.
    pub timestamp_ms: i64,
    /// Price at this index.
    pub price: Option<f64>,
    /// Market capitalization at this index.
    pub market_cap: Option<f64>,
    /// Total volume at this index.
    pub total_volume: Option<f64>,
}

impl MarketChart {
    /// Creates an empty chart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            prices: Vec::new(),
            market_caps: Vec::new(),
            total_volumes: Vec::new(),
        }
    }

    /// Appends another chart's series after this chart's series.
    pub fn append(&mut self, mut other: Self) {
        self.prices.append(&mut other.prices);
        self.market_caps.append(&mut other.market_caps);
        self.total_volumes.append(&mut other.total_volumes);
    }

    /// Returns the length of the longest series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices
            .len()
            .max(self.market_caps.len())
            .max(self.total_volumes.len())
    }

    /// Returns true if all three series are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates index-aligned rows across the three series.
    pub fn rows(&self) -> impl Iterator<Item = ChartRow> + '_ {
        (0..self.len()).filter_map(move |i| {
            let price = self.prices.get(i);
            let market_cap = self.market_caps.get(i);
            let total_volume = self.total_volumes.get(i);
            let timestamp_ms = price.or(market_cap).or(total_volume)?.timestamp_ms;
            Some(ChartRow {
                timestamp_ms,
                price: price.map(|p| p.value),
                market_cap: market_cap.map(|p| p.value),
                total_volume: total_volume.map(|p| p.value),
            })
        })
    }
}

/// A bounded sub-range of a historical query, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkWindow {
    /// Window start, epoch seconds.
    pub from: i64,
    /// Window end, epoch seconds.
    pub to: i64,
}

impl ChunkWindow {
    /// Creates a new window.
    #[must_use]
    pub const fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    /// Returns the window span in seconds.
    #[must_use]
    pub const fn span_seconds(&self) -> i64 {
        self.to - self.from
    }
}

impl std::fmt::Display for ChunkWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fmt_ts = |ts: i64| {
            DateTime::from_timestamp(ts, 0)
                .map_or_else(|| ts.to_string(), |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        };
        write!(f, "{} to {}", fmt_ts(self.from), fmt_ts(self.to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(offset: i64, n: usize) -> MarketChart {
        let points = |scale: f64| {
            (0..n)
                .map(|i| TimeSeriesPoint::new(offset + i as i64, scale * i as f64))
                .collect::<Vec<_>>()
        };
        MarketChart {
            prices: points(1.0),
            market_caps: points(10.0),
            total_volumes: points(100.0),
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let mut merged = chart(0, 2);
        merged.append(chart(1000, 3));

        assert_eq!(merged.len(), 5);
        let timestamps: Vec<i64> = merged.prices.iter().map(|p| p.timestamp_ms).collect();
        assert_eq!(timestamps, vec![0, 1, 1000, 1001, 1002]);
    }

    #[test]
    fn test_rows_with_short_series() {
        let mut c = chart(0, 3);
        c.total_volumes.truncate(1);

        let rows: Vec<ChartRow> = c.rows().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].total_volume, Some(0.0));
        assert_eq!(rows[2].total_volume, None);
        assert_eq!(rows[2].market_cap, Some(20.0));
    }

    #[test]
    fn test_point_from_pair() {
        let point = TimeSeriesPoint::from((1_704_067_200_000.0, 42_000.5));
        assert_eq!(point.timestamp_ms, 1_704_067_200_000);
        assert_eq!(point.value, 42_000.5);
        assert!(point.timestamp().is_some());
    }

    #[test]
    fn test_window_display() {
        let window = ChunkWindow::new(1_704_067_200, 1_704_067_200 + SECONDS_PER_DAY);
        assert_eq!(window.to_string(), "2024-01-01 00:00:00 to 2024-01-02 00:00:00");
        assert_eq!(window.span_seconds(), SECONDS_PER_DAY);
    }
}
