//! One-off evaluation of an under price against an at-least price.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use prop_arb_core::{Direction, MarketKind, OddsFraction, PlayerName, Proposition};
use prop_arb_cross::{ArbitrageEvaluator, EvaluatorConfig, MatchedPair};
use rust_decimal::Decimal;

use super::{load_config, OutputFormat};
use crate::report::TextReport;

/// Arguments for the evaluate command.
#[derive(Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Fractional odds of the under leg (e.g. "1/2", "EVS")
    #[arg(long)]
    pub under: OddsFraction,

    /// Fractional odds of the at-least leg (e.g. "3/1")
    #[arg(long)]
    pub at_least: OddsFraction,

    /// Under line; the at-least leg is its whole-number complement
    #[arg(long, default_value = "1.5")]
    pub line: Decimal,

    /// Total stake (defaults to scan.bankroll from config)
    #[arg(long)]
    pub bankroll: Option<Decimal>,

    /// Player label shown in the report
    #[arg(long, default_value = "Player")]
    pub player: String,

    /// Market label shown in the report
    #[arg(long, default_value = "Shots")]
    pub market: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Runs the evaluate command.
///
/// # Errors
/// Returns an error for an unknown market, a non-positive bankroll or an
/// unreadable config.
pub fn run_evaluate(args: EvaluateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let bankroll = args.bankroll.unwrap_or(config.scan.bankroll);
    let market = MarketKind::from_label(&args.market)
        .ok_or_else(|| anyhow!("Unknown market '{}'", args.market))?;

    let under = Proposition {
        player: PlayerName::new(&args.player),
        market,
        direction: Direction::Under,
        threshold: args.line,
        odds: args.under,
        source: "under".to_string(),
    };
    let at_least = Proposition {
        direction: Direction::AtLeast,
        threshold: under.at_least_boundary(),
        odds: args.at_least,
        source: "at least".to_string(),
        ..under.clone()
    };
    let pair = MatchedPair { under, at_least };

    let evaluator = ArbitrageEvaluator::with_config(EvaluatorConfig::from(&config.scan));
    let implied = ArbitrageEvaluator::combined_implied_probability(&args.under, &args.at_least)
        .context("Combined implied probability overflowed")?;
    let opportunity = evaluator.evaluate(&pair, bankroll)?;

    match (args.output, &opportunity) {
        (OutputFormat::Json, _) => {
            let value = serde_json::json!({
                "under": args.under,
                "at_least": args.at_least,
                "combined_implied_probability": implied.to_f64(),
                "opportunity": opportunity,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        (OutputFormat::Text, Some(opp)) => {
            print!("{}", TextReport::new(&config.report).opportunity(opp));
        }
        (OutputFormat::Text, None) => {
            println!(
                "No arbitrage: {} vs {} has combined implied probability {:.2}%",
                args.under,
                args.at_least,
                implied.to_f64() * 100.0
            );
        }
    }

    Ok(())
}
