//! coinscope CLI - Cryptocurrency market data fetcher.

use anyhow::Result;
use clap::{ArgGroup, CommandFactory, Parser, Subcommand};
use coinscope_lib::Tier;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod display;

use display::Format;

#[derive(Parser)]
#[command(name = "coinscope")]
#[command(about = "Cryptocurrency market data fetcher", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored API key and tier
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// List the top coins by market data
    Markets {
        /// Number of coins to fetch
        #[arg(short = 'n', long, default_value = "100")]
        total: usize,

        /// Quote currency
        #[arg(long, default_value = "usd")]
        vs: String,

        /// Sort order (e.g., market_cap_desc, volume_desc)
        #[arg(long, default_value = "market_cap_desc")]
        order: String,

        /// Restrict to a category slug
        #[arg(short, long)]
        category: Option<String>,

        /// Write results to a file instead of printing a table
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format. Defaults to the output file's extension, then csv.
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },

    /// Search coins by name or symbol
    Search {
        /// Search term
        query: String,
    },

    /// Show current prices for ticker symbols
    Price {
        /// Ticker symbols (e.g., btc eth sol)
        #[arg(required = true)]
        symbols: Vec<String>,

        /// Quote currency
        #[arg(long, default_value = "usd")]
        vs: String,
    },

    /// Fetch historical market data for a coin
    #[command(group(ArgGroup::new("period").required(true).args(["date", "days", "from"])))]
    History {
        /// Coin identifier (e.g., bitcoin), or a ticker with --symbol
        coin: String,

        /// Treat COIN as a ticker symbol and resolve it first
        #[arg(short, long)]
        symbol: bool,

        /// Single day snapshot (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Last N days
        #[arg(long, allow_negative_numbers = true)]
        days: Option<i64>,

        /// Range start (YYYY-MM-DD), from 00:00:00 UTC
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Range end (YYYY-MM-DD), through 23:59:59 UTC
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Quote currency
        #[arg(long, default_value = "usd")]
        vs: String,

        /// Decimal places for values, or "full"
        #[arg(long)]
        precision: Option<String>,

        /// Write results to a file instead of printing a table
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format. Defaults to the output file's extension, then csv.
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },
}

/// Actions for managing credentials.
#[derive(Subcommand)]
enum AuthAction {
    /// Store an API key and tier (prompts for anything not given)
    Set {
        /// API key
        #[arg(long)]
        key: Option<String>,

        /// Account tier (demo, pro)
        #[arg(long)]
        tier: Option<Tier>,
    },

    /// Show the effective credentials
    Show,

    /// Delete stored credentials
    Clear,

    /// Check the credentials against the API
    Test,
}

/// Maps the `-v` count to a log level.
///
/// Warnings stay visible in quiet mode, which only hides progress bars.
const fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the stderr log subscriber.
///
/// `-v` flags take precedence over `RUST_LOG`.
fn init_logging(verbose: u8) {
    let level = log_level(verbose);

    let filter = if verbose > 0 {
        EnvFilter::new(level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(command: Commands, quiet: bool) -> Result<()> {
    match command {
        Commands::Auth { action } => match action {
            AuthAction::Set { key, tier } => commands::auth::set(key, tier),
            AuthAction::Show => commands::auth::show(),
            AuthAction::Clear => commands::auth::clear(),
            AuthAction::Test => commands::auth::test().await,
        },
        Commands::Markets {
            total,
            vs,
            order,
            category,
            output,
            format,
        } => {
            commands::markets::markets(total, &vs, &order, category, output, format, quiet).await
        }
        Commands::Search { query } => commands::search::search(&query).await,
        Commands::Price { symbols, vs } => commands::price::price(&symbols, &vs).await,
        Commands::History {
            coin,
            symbol,
            date,
            days,
            from,
            to,
            vs,
            precision,
            output,
            format,
        } => {
            let period = match (date, days, from, to) {
                (Some(date), _, _, _) => commands::history::Period::Date(date),
                (_, Some(days), _, _) => commands::history::Period::Days(days),
                (_, _, Some(from), Some(to)) => commands::history::Period::Range { from, to },
                _ => anyhow::bail!("one of --date, --days, or --from/--to is required"),
            };
            commands::history::history(
                &coin,
                symbol,
                period,
                &vs,
                precision,
                output,
                format,
                quiet,
            )
            .await
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Show help if no command provided
    let Some(command) = cli.command else {
        return match Cli::command().print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    };

    match run(command, cli.quiet).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(display::exit_code(&err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_keeps_warnings() {
        assert_eq!(log_level(0), "warn");
        assert_eq!(log_level(1), "info");
        assert_eq!(log_level(2), "debug");
        assert_eq!(log_level(5), "trace");
    }

    #[test]
    fn test_quiet_does_not_change_log_level() {
        let cli = Cli::parse_from(["coinscope", "-q", "search", "btc"]);
        assert!(cli.quiet);
        assert_eq!(log_level(cli.verbose), "warn");
    }
}
