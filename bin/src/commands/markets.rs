//! Markets command implementation.
//!
//! This module fetches the top of the market listing and prints or exports it.

use super::connect;
use crate::display::{Format, print_markets, progress_bar, resolve_format, write_markets};
use anyhow::Result;
use coinscope_lib::prelude::*;
use std::path::PathBuf;

/// Fetch the top `total` coins and print a table or write a file.
pub(crate) async fn markets(
    total: usize,
    vs_currency: &str,
    order: &str,
    category: Option<String>,
    output: Option<PathBuf>,
    format: Option<Format>,
    quiet: bool,
) -> Result<()> {
    let client = connect()?;
    let query = MarketsQuery {
        order: order.to_string(),
        category,
        ..MarketsQuery::new(vs_currency.to_lowercase())
    };

    let progress = progress_bar(quiet, "pages", format!("top {total} in {vs_currency}"));
    let entries = fetch_markets_paged(
        &client,
        total,
        coinscope_lib::MAX_PER_PAGE,
        &query,
        |p| {
            progress.set_length(p.pages_needed as u64);
            progress.set_position(p.page as u64);
        },
    )
    .await;
    progress.finish_and_clear();
    let entries = entries?;

    match output {
        Some(output) => {
            write_markets(&entries, &output, resolve_format(format, &output))?;
            if !quiet {
                println!("Wrote {} coins to: {}", entries.len(), output.display());
            }
        }
        None => print_markets(&entries),
    }

    Ok(())
}
