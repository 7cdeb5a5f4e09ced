//! History command implementation.
//!
//! This module handles single-day snapshots, recent charts, and stitched
//! date ranges for one coin.

use super::connect;
use crate::display::{
    Format, format_amount, format_price, print_chart, progress_bar, resolve_format, write_chart,
};
use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use coinscope_lib::prelude::*;
use coinscope_lib::{parse_date, resolve_symbol};
use std::path::PathBuf;

/// The period a history request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Period {
    /// One past day (YYYY-MM-DD).
    Date(String),
    /// The last N days.
    Days(i64),
    /// An inclusive date range (YYYY-MM-DD).
    Range { from: String, to: String },
}

/// A validated history request.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Request {
    Snapshot(String),
    Recent(i64),
    Range { from: i64, to: i64 },
}

impl Request {
    /// Checks the period before any request is sent.
    fn validate(period: Period) -> Result<Self, InputError> {
        match period {
            Period::Date(date) => {
                parse_date(&date)?;
                Ok(Self::Snapshot(date))
            }
            Period::Days(days) if days < 1 => Err(InputError::NonPositiveDays(days)),
            Period::Days(days) => Ok(Self::Recent(days)),
            Period::Range { from, to } => {
                let (from, to) = range_bounds(&from, &to)?;
                if from >= to {
                    return Err(InputError::InvalidRange { from, to });
                }
                Ok(Self::Range { from, to })
            }
        }
    }
}

/// Converts an inclusive date range to epoch-second bounds.
///
/// `from` maps to 00:00:00 UTC and `to` to 23:59:59 UTC.
fn range_bounds(from: &str, to: &str) -> Result<(i64, i64), InputError> {
    let from = parse_date(from)?;
    let to = parse_date(to)?;
    Ok((day_start(from), day_end(to)))
}

fn day_start(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn day_end(date: NaiveDate) -> i64 {
    day_start(date) + 86_399
}

/// Fetch historical data for a coin and print it or write a file.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn history(
    coin: &str,
    is_symbol: bool,
    period: Period,
    vs_currency: &str,
    precision: Option<String>,
    output: Option<PathBuf>,
    format: Option<Format>,
    quiet: bool,
) -> Result<()> {
    let request = Request::validate(period).map_err(Error::from)?;
    let client = connect()?;

    let id = if is_symbol {
        resolve_symbol(&client, coin)
            .await?
            .ok_or_else(|| Error::from(InputError::NoSymbolsResolved(vec![coin.to_string()])))?
    } else {
        coin.trim().to_lowercase()
    };

    let query = ChartQuery {
        precision,
        ..ChartQuery::new(vs_currency.to_lowercase())
    };

    let chart = match request {
        Request::Snapshot(date) => {
            let snapshot = fetch_snapshot(&client, &id, &date, vs_currency).await?;
            print_snapshot(&snapshot);
            return Ok(());
        }
        Request::Recent(days) => fetch_recent(&client, &id, days, &query).await?,
        Request::Range { from, to } => {
            let progress = progress_bar(quiet, "windows", format!("{id} in {vs_currency}"));
            let chart = fetch_range_chunked(
                &client,
                &id,
                from,
                to,
                coinscope_lib::MAX_WINDOW_DAYS,
                &query,
                |p| {
                    progress.set_length(p.count as u64);
                    progress.set_position(p.index as u64 + 1);
                },
            )
            .await;
            progress.finish_and_clear();
            chart?
        }
    };

    match output {
        Some(output) => {
            write_chart(&chart, &output, resolve_format(format, &output))?;
            if !quiet {
                println!("Wrote {} points to: {}", chart.len(), output.display());
            }
        }
        None => print_chart(&chart),
    }

    Ok(())
}

fn print_snapshot(snapshot: &DailySnapshot) {
    let vs = snapshot.vs_currency.to_uppercase();
    println!(
        "{} ({}) on {}",
        snapshot.name,
        snapshot.symbol.to_uppercase(),
        snapshot.date.format("%Y-%m-%d")
    );
    println!("Price:      {} {vs}", format_price(snapshot.price));
    println!("Market cap: {} {vs}", format_amount(snapshot.market_cap));
    println!("Volume:     {} {vs}", format_amount(snapshot.volume));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_bounds_cover_whole_days() {
        let (from, to) = range_bounds("2024-01-01", "2024-01-31").unwrap();
        assert_eq!(from, 1_704_067_200);
        assert_eq!(to, 1_704_067_200 + 31 * 86_400 - 1);
    }

    #[test]
    fn test_range_bounds_single_day() {
        let (from, to) = range_bounds("2024-01-01", "2024-01-01").unwrap();
        assert_eq!(to - from, 86_399);
    }

    #[test]
    fn test_validate_rejects_before_request() {
        assert_eq!(
            Request::validate(Period::Days(0)),
            Err(InputError::NonPositiveDays(0))
        );
        assert!(matches!(
            Request::validate(Period::Range {
                from: "2024-02-01".to_string(),
                to: "2024-01-01".to_string(),
            }),
            Err(InputError::InvalidRange { .. })
        ));
        assert_eq!(
            Request::validate(Period::Date("2024-01-15".to_string())),
            Ok(Request::Snapshot("2024-01-15".to_string()))
        );
    }

    #[test]
    fn test_range_bounds_rejects_bad_date() {
        assert!(matches!(
            range_bounds("2024-01-01", "31/01/2024"),
            Err(InputError::InvalidDate(_))
        ));
    }
}
