//! Display utilities and output formatting for the coinscope CLI.

use anyhow::{Context, Result};
use clap::ValueEnum;
use coinscope_lib::prelude::*;
use coinscope_lib::formatter_for;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Output format for exported data.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum Format {
    Csv,
    Json,
    Ndjson,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => Self::Csv,
            Format::Json => Self::Json,
            Format::Ndjson => Self::Ndjson,
        }
    }
}

/// Picks the export format: explicit flag, then file extension, then CSV.
pub(crate) fn resolve_format(format: Option<Format>, output: &Path) -> OutputFormat {
    format
        .map(OutputFormat::from)
        .or_else(|| OutputFormat::from_path(output))
        .unwrap_or_default()
}

/// Returns the process exit code for a command failure.
///
/// Classified fetch failures keep their own code; anything else exits with 1.
pub(crate) fn exit_code(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<Error>())
        .map_or(1, |e| u8::try_from(e.exit_code()).unwrap_or(1))
}

/// Creates a progress bar, hidden in quiet mode.
pub(crate) fn progress_bar(quiet: bool, unit: &str, message: String) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {unit} {{msg}}"
            ))
            .expect("Invalid progress template")
            .progress_chars("=>-"),
    );
    pb.set_message(message);
    pb
}

/// Write market entries to a file in the specified format.
pub(crate) fn write_markets(
    entries: &[MarketEntry],
    output: &Path,
    format: OutputFormat,
) -> Result<()> {
    write_file(output, |writer| {
        formatter_for(format).write_markets(entries, writer)?;
        Ok(())
    })
}

/// Write a chart to a file in the specified format.
pub(crate) fn write_chart(chart: &MarketChart, output: &Path, format: OutputFormat) -> Result<()> {
    write_file(output, |writer| {
        formatter_for(format).write_chart(chart, writer)?;
        Ok(())
    })
}

fn write_file(output: &Path, body: impl FnOnce(&mut dyn Write) -> Result<()>) -> Result<()> {
    let file = File::create(output)
        .with_context(|| format!("Failed to create output file: {}", output.display()))?;
    let mut writer = BufWriter::new(file);
    body(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Formats a price, keeping more decimals below one unit.
pub(crate) fn format_price(value: Option<f64>) -> String {
    match value {
        None => "-".to_string(),
        Some(v) if v.abs() >= 1.0 => format!("{v:.2}"),
        Some(v) => format!("{v:.6}"),
    }
}

/// Formats a large amount with a K/M/B/T suffix.
pub(crate) fn format_amount(value: Option<f64>) -> String {
    let Some(v) = value else {
        return "-".to_string();
    };
    let (scaled, suffix) = match v.abs() {
        a if a >= 1e12 => (v / 1e12, "T"),
        a if a >= 1e9 => (v / 1e9, "B"),
        a if a >= 1e6 => (v / 1e6, "M"),
        a if a >= 1e3 => (v / 1e3, "K"),
        _ => (v, ""),
    };
    format!("{scaled:.2}{suffix}")
}

/// Formats a percentage change with an explicit sign.
pub(crate) fn format_change(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:+.2}%"))
}

/// Formats an optional rank.
pub(crate) fn format_rank(rank: Option<u32>) -> String {
    rank.map_or_else(|| "-".to_string(), |r| r.to_string())
}

/// Print market entries as a table.
pub(crate) fn print_markets(entries: &[MarketEntry]) {
    println!(
        "{:>5} {:<8} {:<24} {:>14} {:>9} {:>12} {:>12}",
        "RANK", "SYMBOL", "NAME", "PRICE", "24H", "MARKET CAP", "VOLUME"
    );
    println!("{}", "-".repeat(90));

    for entry in entries {
        println!(
            "{:>5} {:<8} {:<24} {:>14} {:>9} {:>12} {:>12}",
            format_rank(entry.rank),
            entry.symbol.to_uppercase(),
            truncate(&entry.name, 24),
            format_price(entry.price),
            format_change(entry.change_24h),
            format_amount(entry.market_cap),
            format_amount(entry.volume),
        );
    }

    println!("\nTotal: {} coins", entries.len());
}

/// Print a chart as a table of index-aligned rows.
pub(crate) fn print_chart(chart: &MarketChart) {
    println!(
        "{:<20} {:>14} {:>12} {:>12}",
        "TIMESTAMP (UTC)", "PRICE", "MARKET CAP", "VOLUME"
    );
    println!("{}", "-".repeat(61));

    for row in chart.rows() {
        let timestamp = chrono::DateTime::from_timestamp_millis(row.timestamp_ms).map_or_else(
            || row.timestamp_ms.to_string(),
            |dt| dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        );
        println!(
            "{:<20} {:>14} {:>12} {:>12}",
            timestamp,
            format_price(row.price),
            format_amount(row.market_cap),
            format_amount(row.total_volume),
        );
    }

    println!("\nTotal: {} points", chart.len());
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(Some(1.234e12)), "1.23T");
        assert_eq!(format_amount(Some(5.6e9)), "5.60B");
        assert_eq!(format_amount(Some(999.0)), "999.00");
        assert_eq!(format_amount(None), "-");
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(64_000.123)), "64000.12");
        assert_eq!(format_price(Some(0.000_123_4)), "0.000123");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(Some(1.5)), "+1.50%");
        assert_eq!(format_change(Some(-0.25)), "-0.25%");
    }

    #[test]
    fn test_resolve_format() {
        let path = PathBuf::from("top.ndjson");
        assert_eq!(resolve_format(None, &path), OutputFormat::Ndjson);
        assert_eq!(resolve_format(Some(Format::Json), &path), OutputFormat::Json);
        assert_eq!(resolve_format(None, Path::new("top")), OutputFormat::Csv);
    }

    #[test]
    fn test_exit_code_through_context() {
        let err = anyhow::Error::new(Error::RateLimited).context("fetching markets");
        assert_eq!(exit_code(&err), 4);
        assert_eq!(exit_code(&anyhow::anyhow!("disk full")), 1);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Bitcoin", 24), "Bitcoin");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
