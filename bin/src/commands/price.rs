//! Price command implementation.

use super::connect;
use crate::display::{format_amount, format_change, format_price};
use anyhow::Result;
use coinscope_lib::prelude::*;

/// Resolve ticker symbols and print their current prices.
pub(crate) async fn price(symbols: &[String], vs_currency: &str) -> Result<()> {
    let client = connect()?;
    let ids = resolve_symbols(&client, symbols).await?;
    let prices = fetch_simple_prices(&client, &ids, vs_currency).await?;

    let vs = vs_currency.to_uppercase();
    println!(
        "{:<24} {:>16} {:>9} {:>12} {:>12}",
        "ID",
        format!("PRICE ({vs})"),
        "24H",
        "MARKET CAP",
        "VOLUME"
    );
    println!("{}", "-".repeat(77));

    for price in &prices {
        println!(
            "{:<24} {:>16} {:>9} {:>12} {:>12}",
            price.id,
            format_price(price.price),
            format_change(price.change_24h),
            format_amount(price.market_cap),
            format_amount(price.volume_24h),
        );
    }

    Ok(())
}
