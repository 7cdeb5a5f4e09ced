//! CSV output format.

use coinscope_types::{MarketChart, MarketEntry};
use std::fmt::Display;
use std::io::Write;

use crate::formatter::format_timestamp;
use crate::{FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }

    /// Quotes a text field if it contains the delimiter, a quote, or a newline.
    fn text(&self, value: &str) -> String {
        if value.contains([self.delimiter, '"', '\n', '\r']) {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}

/// Renders an optional value, leaving the cell empty when absent.
fn cell<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl Formatter for CsvFormatter {
    fn write_markets(
        &self,
        entries: &[MarketEntry],
        writer: &mut dyn Write,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(
                writer,
                "rank{d}id{d}symbol{d}name{d}price{d}change_24h{d}market_cap{d}volume"
            )?;
        }

        for entry in entries {
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}{d}{}",
                cell(entry.rank),
                self.text(&entry.id),
                self.text(&entry.symbol),
                self.text(&entry.name),
                cell(entry.price),
                cell(entry.change_24h),
                cell(entry.market_cap),
                cell(entry.volume),
            )?;
        }

        Ok(())
    }

    fn write_chart(&self, chart: &MarketChart, writer: &mut dyn Write) -> Result<(), FormatError> {
        let d = self.delimiter;

        if self.include_header {
            writeln!(writer, "timestamp{d}price{d}market_cap{d}total_volume")?;
        }

        for row in chart.rows() {
            writeln!(
                writer,
                "{}{d}{}{d}{}{d}{}",
                format_timestamp(row.timestamp_ms),
                cell(row.price),
                cell(row.market_cap),
                cell(row.total_volume),
            )?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}
