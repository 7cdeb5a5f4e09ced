//! Search command implementation.

use super::connect;
use crate::display::format_rank;
use anyhow::Result;

/// Search coins by free text and print the candidates.
pub(crate) async fn search(query: &str) -> Result<()> {
    let client = connect()?;
    let candidates = coinscope_lib::search(&client, query).await?;

    if candidates.is_empty() {
        println!("No coins found.");
        return Ok(());
    }

    println!("{:>5} {:<10} {:<28} {:<30}", "RANK", "SYMBOL", "NAME", "ID");
    println!("{}", "-".repeat(76));

    for candidate in &candidates {
        println!(
            "{:>5} {:<10} {:<28} {:<30}",
            format_rank(candidate.rank),
            candidate.symbol.to_uppercase(),
            candidate.name,
            candidate.id
        );
    }

    println!("\nTotal: {} coins", candidates.len());
    Ok(())
}
