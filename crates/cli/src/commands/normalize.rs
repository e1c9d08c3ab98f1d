//! Normalize command: show how one book's rows are read.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use prop_arb_cross::PropositionNormalizer;

use super::{load_config, OutputFormat};
use crate::books::BookSpec;
use crate::report::TextReport;

/// Arguments for the normalize command.
#[derive(Args, Debug, Clone)]
pub struct NormalizeArgs {
    /// Book to load as SOURCE=FORMAT:PATH
    #[arg(long)]
    pub book: BookSpec,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Runs the normalize command.
///
/// # Errors
/// Returns an error if the book or config cannot be loaded.
pub fn run_normalize(args: NormalizeArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let book = args.book.load()?;

    let normalizer = PropositionNormalizer::with_config(config.normalizer.clone());
    let batch = normalizer.normalize_batch(&book.records);

    match args.output {
        OutputFormat::Text => print!("{}", TextReport::new(&config.report).normalized(&batch)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&batch)?),
    }

    Ok(())
}
