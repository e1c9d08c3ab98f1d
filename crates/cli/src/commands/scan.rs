//! Scan command: load books, compare every pair, report opportunities.
//!
//! ## Example Usage
//!
//! ```bash
//! prop-arb scan \
//!     --book bet365=over-under:pages/bet365.txt \
//!     --book skybet=ladder:pages/skybet.txt \
//!     --book williamhill=selection:pages/williamhill.txt \
//!     --bankroll 250 --min-roi 1
//! ```

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use prop_arb_cross::{ArbitrageScanner, Book};
use rust_decimal::Decimal;

use super::{load_config, OutputFormat};
use crate::books::BookSpec;
use crate::report::{scan_json, TextReport};

/// Arguments for the scan command.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Book to load as SOURCE=FORMAT:PATH (repeat for each book, at least two).
    /// Formats: json, csv, over-under, ladder, selection
    #[arg(long = "book", required = true)]
    pub books: Vec<BookSpec>,

    /// Total stake split across both legs (defaults to scan.bankroll from config)
    #[arg(long)]
    pub bankroll: Option<Decimal>,

    /// Only report opportunities above this ROI percentage
    #[arg(long)]
    pub min_roi: Option<Decimal>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Config file path (defaults to config/Config.toml plus PROPARB_ env vars)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Runs the scan command.
///
/// # Errors
/// Returns an error if fewer than two books are given, a book cannot be
/// loaded, the config is malformed, or the bankroll is not positive.
pub fn run_scan(args: ScanArgs) -> Result<()> {
    if args.books.len() < 2 {
        bail!("scan needs at least two books (got {})", args.books.len());
    }

    let mut config = load_config(args.config.as_deref())?;
    if let Some(min_roi) = args.min_roi {
        config.scan.min_roi_pct = min_roi;
    }
    let bankroll = args.bankroll.unwrap_or(config.scan.bankroll);

    let books = args
        .books
        .iter()
        .map(BookSpec::load)
        .collect::<Result<Vec<Book>>>()?;

    tracing::info!(
        books = books.len(),
        bankroll = %bankroll,
        min_roi_pct = %config.scan.min_roi_pct,
        "Starting scan"
    );

    let report = ArbitrageScanner::from_config(&config).scan_books(&books, bankroll)?;

    match args.output {
        OutputFormat::Text => print!("{}", TextReport::new(&config.report).scan(&report)),
        OutputFormat::Json => println!("{}", scan_json(&report)?),
    }

    Ok(())
}
