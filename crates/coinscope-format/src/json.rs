//! JSON output format.

use coinscope_types::{ChartRow, MarketChart, MarketEntry};
use serde::Serialize;
use std::io::Write;

use crate::formatter::format_timestamp;
use crate::{FormatError, Formatter};

/// JSON output style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    /// JSON array (standard JSON).
    #[default]
    Array,
    /// Newline-delimited JSON (NDJSON/JSONL).
    Ndjson,
}

/// JSON formatter.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    /// Output style.
    style: JsonStyle,
    /// Whether to pretty-print (only for array style).
    pretty: bool,
}

/// Serialized form of one chart row.
#[derive(Serialize)]
struct ChartRecord {
    timestamp: String,
    timestamp_ms: i64,
    price: Option<f64>,
    market_cap: Option<f64>,
    total_volume: Option<f64>,
}

impl From<ChartRow> for ChartRecord {
    fn from(row: ChartRow) -> Self {
        Self {
            timestamp: format_timestamp(row.timestamp_ms),
            timestamp_ms: row.timestamp_ms,
            price: row.price,
            market_cap: row.market_cap,
            total_volume: row.total_volume,
        }
    }
}

impl JsonFormatter {
    /// Creates a new JSON formatter with default settings (array style).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            style: JsonStyle::Array,
            pretty: false,
        }
    }

    /// Creates a new NDJSON formatter.
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            style: JsonStyle::Ndjson,
            pretty: false,
        }
    }

    /// Sets whether to pretty-print output (array style only).
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Sets the output style.
    #[must_use]
    pub const fn with_style(mut self, style: JsonStyle) -> Self {
        self.style = style;
        self
    }

    fn write_records<S: Serialize>(
        &self,
        records: &[S],
        mut writer: &mut dyn Write,
    ) -> Result<(), FormatError> {
        match self.style {
            JsonStyle::Array => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, records)?;
                } else {
                    serde_json::to_writer(&mut writer, records)?;
                }
                writeln!(writer)?;
            }
            JsonStyle::Ndjson => {
                for record in records {
                    serde_json::to_writer(&mut writer, record)?;
                    writeln!(writer)?;
                }
            }
        }
        Ok(())
    }
}

impl Formatter for JsonFormatter {
    fn write_markets(
        &self,
        entries: &[MarketEntry],
        writer: &mut dyn Write,
    ) -> Result<(), FormatError> {
        self.write_records(entries, writer)
    }

    fn write_chart(&self, chart: &MarketChart, writer: &mut dyn Write) -> Result<(), FormatError> {
        let records: Vec<ChartRecord> = chart.rows().map(ChartRecord::from).collect();
        self.write_records(&records, writer)
    }

    fn extension(&self) -> &str {
        match self.style {
            JsonStyle::Array => "json",
            JsonStyle::Ndjson => "ndjson",
        }
    }
}
