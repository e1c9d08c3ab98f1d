//! End-to-end scan: normalize books, match them pairwise, evaluate pairs.

use prop_arb_core::{AppConfig, PropError, PropResult, Proposition};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::detector::{
    ArbitrageEvaluator, ArbitrageOpportunity, DetectionSummary, EvaluatorConfig,
};
use crate::matcher::{dedupe, MatchConfig, PropositionMatcher};
use crate::normalizer::PropositionNormalizer;
use crate::types::{Book, RejectedRow};

/// Everything a scan produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Opportunities, best ROI first.
    pub opportunities: Vec<ArbitrageOpportunity>,
    /// Rows the normalizer rejected, in input order.
    pub rejected: Vec<RejectedRow>,
    /// Counters and headline figures.
    pub summary: DetectionSummary,
}

impl ScanReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.opportunities.is_empty()
    }
}

/// Runs normalizer, matcher and evaluator over a set of books.
#[derive(Debug, Default)]
pub struct ArbitrageScanner {
    normalizer: PropositionNormalizer,
    matcher: PropositionMatcher,
    evaluator: ArbitrageEvaluator,
}

impl ArbitrageScanner {
    /// Creates a scanner with default components.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scanner wired from application config.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            normalizer: PropositionNormalizer::with_config(config.normalizer.clone()),
            matcher: PropositionMatcher::with_config(
                MatchConfig::default()
                    .with_distinct_sources(config.scan.require_distinct_sources),
            ),
            evaluator: ArbitrageEvaluator::with_config(EvaluatorConfig::from(&config.scan)),
        }
    }

    /// Scans two books against each other.
    ///
    /// # Errors
    ///
    /// Returns [`PropError::InvalidStake`] for a non-positive bankroll.
    pub fn scan(&self, book_a: &Book, book_b: &Book, bankroll: Decimal) -> PropResult<ScanReport> {
        self.scan_books(&[book_a.clone(), book_b.clone()], bankroll)
    }

    /// Scans every unordered pair of books.
    ///
    /// # Errors
    ///
    /// Returns [`PropError::InvalidStake`] for a non-positive bankroll. Bad
    /// rows and overflowing pairs are recorded in the report instead.
    pub fn scan_books(&self, books: &[Book], bankroll: Decimal) -> PropResult<ScanReport> {
        if bankroll <= Decimal::ZERO {
            return Err(PropError::InvalidStake { stake: bankroll });
        }

        let mut report = ScanReport::default();

        let normalized: Vec<Vec<Proposition>> = books
            .iter()
            .map(|book| {
                let batch = self.normalizer.normalize_batch(&book.records);
                report.summary.rows_seen += count(batch.rows_seen());
                report.summary.propositions += count(batch.propositions.len());
                report.summary.rejected_rows += count(batch.rejected.len());
                report.rejected.extend(batch.rejected);

                let (kept, duplicates) = dedupe(&batch.propositions);
                report.summary.duplicate_lines += count(duplicates);
                kept
            })
            .collect();

        for (i, book_a) in normalized.iter().enumerate() {
            for book_b in &normalized[i + 1..] {
                // Books are already deduplicated, so the matcher drops nothing.
                let outcome = self.matcher.match_books(book_a, book_b);
                report.summary.pairs_matched += count(outcome.pairs.len());

                for pair in &outcome.pairs {
                    match self.evaluator.evaluate(pair, bankroll) {
                        Ok(Some(opp)) => report.opportunities.push(opp),
                        Ok(None) => {}
                        Err(err) => {
                            report.summary.evaluation_failures += 1;
                            warn!(
                                player = %pair.player(),
                                market = %pair.market(),
                                under_odds = %pair.under.odds,
                                at_least_odds = %pair.at_least.odds,
                                error = %err,
                                "Pair evaluation failed"
                            );
                        }
                    }
                }
            }
        }

        report
            .opportunities
            .sort_by(|a, b| b.roi_pct.cmp(&a.roi_pct));
        for opp in &report.opportunities {
            report.summary.record(opp);
        }

        info!(
            books = books.len(),
            rows_seen = report.summary.rows_seen,
            rejected_rows = report.summary.rejected_rows,
            pairs_matched = report.summary.pairs_matched,
            opportunities = report.summary.opportunities,
            total_potential_profit = %report.summary.total_potential_profit.round_dp(2),
            "Scan complete"
        );

        Ok(report)
    }
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prop_arb_core::{RawRecord, ScanConfig};
    use rust_decimal_macros::dec;

    fn bet365() -> Book {
        Book::new(
            "bet365",
            vec![
                RawRecord::new("", "Callum Wilson", "Player Shots Over/Under", "Under 0.5 4/6"),
                RawRecord::new("", "Callum Wilson", "Player Shots Over/Under", "Under 1.5 1/2"),
                RawRecord::new("", "Jarrod Bowen", "Player Shots On Target Over/Under", "Under 0.5 10/11"),
            ],
        )
    }

    fn skybet() -> Book {
        Book::new(
            "skybet",
            vec![
                RawRecord::new("", "Callum Wilson", "Player Shots", "1+").with_odds("6/4"),
                RawRecord::new("", "Callum Wilson", "Player Shots", "2+").with_odds("3/1"),
                RawRecord::new("", "Jarrod Bowen", "Player Shots On Target", "1+").with_odds("10/11"),
            ],
        )
    }

    // ==================== Scan Tests ====================

    #[test]
    fn test_scan_finds_only_profitable_pairs() {
        let scanner = ArbitrageScanner::new();
        let report = scanner.scan(&bet365(), &skybet(), dec!(100)).unwrap();

        // 4/6 vs 6/4 is break-even, 10/11 vs 10/11 is overround.
        assert_eq!(report.opportunities.len(), 1);
        let opp = &report.opportunities[0];
        assert_eq!(opp.player().display(), "Callum Wilson");
        assert_eq!(opp.roi_pct.round_dp(2), dec!(9.09));
        assert_eq!(opp.pair.under.source, "bet365");
        assert_eq!(opp.pair.at_least.source, "skybet");

        assert_eq!(report.summary.rows_seen, 6);
        assert_eq!(report.summary.pairs_matched, 3);
        assert_eq!(report.summary.opportunities, 1);
        assert!(report.rejected.is_empty());
    }

    #[test]
    fn test_scan_isolates_malformed_row() {
        let mut book = bet365();
        book.records.push(RawRecord::new(
            "bet365",
            "Lucas Paqueta",
            "Player Shots Over/Under",
            "Under 0.5 4/0",
        ));

        let report = ArbitrageScanner::new()
            .scan(&book, &skybet(), dec!(100))
            .unwrap();

        assert_eq!(report.summary.rows_seen, 7);
        assert_eq!(report.summary.propositions, 6);
        assert_eq!(report.summary.rejected_rows, 1);
        assert_eq!(report.rejected[0].kind, "malformed_odds");
        assert_eq!(report.opportunities.len(), 1);
    }

    #[test]
    fn test_scan_rejects_invalid_bankroll() {
        let err = ArbitrageScanner::new()
            .scan(&bet365(), &skybet(), Decimal::ZERO)
            .unwrap_err();
        assert_eq!(err, PropError::InvalidStake { stake: Decimal::ZERO });
    }

    #[test]
    fn test_scan_books_compares_every_pair() {
        let williamhill = Book::new(
            "williamhill",
            vec![RawRecord::new(
                "",
                "Callum Wilson",
                "Shots",
                "Callum Wilson Over 1 Shot 4/1",
            )],
        );

        let report = ArbitrageScanner::new()
            .scan_books(&[bet365(), skybet(), williamhill], dec!(100))
            .unwrap();

        // bet365 under 1.5 pairs with Sky Bet 2+ and William Hill over 1.
        assert_eq!(report.opportunities.len(), 2);
        assert_eq!(report.opportunities[0].pair.at_least.source, "williamhill");
        assert!(report.opportunities[0].roi_pct > report.opportunities[1].roi_pct);

        let best = report.summary.best_opportunity.as_ref().unwrap();
        assert_eq!(best.at_least_source, "williamhill");
        assert_eq!(
            report.summary.total_potential_profit,
            report.opportunities[0].profit + report.opportunities[1].profit
        );
    }

    #[test]
    fn test_scan_books_counts_duplicate_once() {
        let mut book = bet365();
        book.records.push(RawRecord::new(
            "bet365",
            "Callum Wilson",
            "Player Shots Over/Under",
            "Under 0.5 1/2",
        ));
        let betway = Book::new(
            "betway",
            vec![RawRecord::new("", "Callum Wilson", "Player Shots", "1+").with_odds("5/4")],
        );
        let paddy = Book::new(
            "paddypower",
            vec![RawRecord::new("", "Callum Wilson", "Player Shots", "2+").with_odds("5/2")],
        );

        let report = ArbitrageScanner::new()
            .scan_books(&[book, skybet(), betway, paddy], dec!(100))
            .unwrap();

        assert_eq!(report.summary.duplicate_lines, 1);
        assert_eq!(report.summary.rows_seen, 9);
        // The repeated under 0.5 quote is dropped before pairing.
        assert_eq!(report.summary.pairs_matched, 5);
    }

    #[test]
    fn test_scan_respects_min_roi_from_config() {
        let config = AppConfig {
            scan: ScanConfig {
                min_roi_pct: dec!(10),
                ..ScanConfig::default()
            },
            ..AppConfig::default()
        };

        let report = ArbitrageScanner::from_config(&config)
            .scan(&bet365(), &skybet(), dec!(100))
            .unwrap();
        assert!(report.is_empty());
        assert_eq!(report.summary.pairs_matched, 3);
    }
}
