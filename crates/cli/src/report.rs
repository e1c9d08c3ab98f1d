//! Text and JSON rendering of scan results.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use prop_arb_core::ReportConfig;
use prop_arb_cross::{ArbitrageOpportunity, NormalizedBatch, RejectedRow, ScanReport};
use rust_decimal::Decimal;

/// Renders scan results for a terminal.
#[derive(Debug, Clone)]
pub struct TextReport<'a> {
    config: &'a ReportConfig,
}

impl<'a> TextReport<'a> {
    #[must_use]
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    fn money(&self, amount: Decimal) -> String {
        format!(
            "{}{:.*}",
            self.config.currency_symbol,
            self.config.decimal_places as usize,
            amount.round_dp(self.config.decimal_places)
        )
    }

    fn pct(&self, pct: Decimal) -> String {
        format!("{:.2}%", pct.round_dp(2))
    }

    /// One opportunity block.
    #[must_use]
    pub fn opportunity(&self, opp: &ArbitrageOpportunity) -> String {
        let under = &opp.pair.under;
        let at_least = &opp.pair.at_least;

        let mut out = String::new();
        let _ = writeln!(out, "ARBITRAGE OPPORTUNITY! - {}", opp.market());
        let _ = writeln!(out, "Player: {}", opp.player());
        let _ = writeln!(
            out,
            "{} '{}' Odds: {}",
            under.source,
            under.line_label(),
            under.odds
        );
        let _ = writeln!(
            out,
            "{} '{}' Odds: {}",
            at_least.source,
            at_least.line_label(),
            at_least.odds
        );
        let _ = writeln!(out, "Guaranteed ROI: {}", self.pct(opp.roi_pct));
        let _ = writeln!(
            out,
            "Suggested bet on {}: {}",
            under.source,
            self.money(opp.stake_under)
        );
        let _ = writeln!(
            out,
            "Suggested bet on {}: {}",
            at_least.source,
            self.money(opp.stake_at_least)
        );
        let _ = writeln!(
            out,
            "Total Profit with {} wallet: {}",
            self.money(opp.bankroll),
            self.money(opp.profit)
        );
        let _ = writeln!(out, "{}", "-".repeat(40));
        out
    }

    /// Full scan report: opportunities, rejected rows, summary line.
    #[must_use]
    pub fn scan(&self, report: &ScanReport) -> String {
        let mut out = String::new();

        if report.opportunities.is_empty() {
            let _ = writeln!(out, "No arbitrage opportunities found.");
            let _ = writeln!(out, "{}", "-".repeat(40));
        }
        for opp in &report.opportunities {
            out.push_str(&self.opportunity(opp));
        }

        if !report.rejected.is_empty() {
            out.push_str(&rejected_rows(&report.rejected));
        }

        let summary = &report.summary;
        let _ = writeln!(
            out,
            "Scanned {} rows ({} rejected, {} duplicate), matched {} pairs: {} opportunities, total profit {}",
            summary.rows_seen,
            summary.rejected_rows,
            summary.duplicate_lines,
            summary.pairs_matched,
            summary.opportunities,
            self.money(summary.total_potential_profit)
        );
        if summary.evaluation_failures > 0 {
            let _ = writeln!(
                out,
                "{} pairs could not be evaluated (arithmetic overflow)",
                summary.evaluation_failures
            );
        }
        out
    }

    /// Normalized propositions of a single book, then its rejected rows.
    #[must_use]
    pub fn normalized(&self, batch: &NormalizedBatch) -> String {
        let mut out = String::new();
        for prop in &batch.propositions {
            let _ = writeln!(out, "{prop}");
        }
        if !batch.rejected.is_empty() {
            out.push_str(&rejected_rows(&batch.rejected));
        }
        let _ = writeln!(
            out,
            "{} rows: {} propositions, {} rejected",
            batch.rows_seen(),
            batch.propositions.len(),
            batch.rejected.len()
        );
        out
    }
}

fn rejected_rows(rows: &[RejectedRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Rejected rows:");
    for row in rows {
        let _ = writeln!(
            out,
            "  [{}] {} | {} | {}: {}",
            row.source, row.player, row.line, row.kind, row.reason
        );
    }
    out
}

/// Serializes the whole scan report as pretty JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn scan_json(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize scan report")
}
