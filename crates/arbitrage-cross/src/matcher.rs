//! Cross-book proposition matching.
//!
//! Pairs an `under t` quote on one book with the `at least ceil(t)` quote
//! for the same player and market on the other:
//!
//! ```text
//! bet365  Callum Wilson  Shots  Under 1.5  1/2
//! Sky Bet Callum Wilson  Shots  2+         3/1
//!         -> key (callum wilson, Shots, 2) on both sides -> MatchedPair
//! ```
//!
//! Matching is direction-agnostic: `at least` quotes on the first book are
//! paired with `under` quotes on the second just the same.

use std::collections::{HashMap, HashSet};

use prop_arb_core::{CanonicalKey, LineKey, Proposition};
use tracing::{debug, info, warn};

use crate::types::{Leg, MatchedPair};

// =============================================================================
// Match Configuration
// =============================================================================

/// Configuration for cross-book matching.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Refuse to pair two quotes carrying the same source label.
    pub require_distinct_sources: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            require_distinct_sources: true,
        }
    }
}

impl MatchConfig {
    /// Sets whether sources must differ.
    #[must_use]
    pub fn with_distinct_sources(mut self, required: bool) -> Self {
        self.require_distinct_sources = required;
        self
    }
}

// =============================================================================
// Match Outcome
// =============================================================================

/// Pairs found between two books, plus bookkeeping.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Complementary pairs, in first-book order.
    pub pairs: Vec<MatchedPair>,
    /// Quotes dropped because their source already quoted the same line.
    pub duplicates: usize,
}

// =============================================================================
// Proposition Matcher
// =============================================================================

/// Finds complementary propositions across two books.
#[derive(Debug, Default)]
pub struct PropositionMatcher {
    config: MatchConfig,
}

impl PropositionMatcher {
    /// Creates a matcher with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MatchConfig::default(),
        }
    }

    /// Creates a matcher with custom configuration.
    #[must_use]
    pub fn with_config(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Returns all complementary pairs between two books.
    #[must_use]
    pub fn find_matches(
        &self,
        book_a: &[Proposition],
        book_b: &[Proposition],
    ) -> Vec<MatchedPair> {
        self.match_books(book_a, book_b).pairs
    }

    /// Returns all complementary pairs between two books along with the
    /// number of duplicate quotes dropped.
    #[must_use]
    pub fn match_books(&self, book_a: &[Proposition], book_b: &[Proposition]) -> MatchOutcome {
        let (book_a, dup_a) = dedupe(book_a);
        let (book_b, dup_b) = dedupe(book_b);

        let mut index: HashMap<(CanonicalKey, Leg), Vec<&Proposition>> = HashMap::new();
        for prop in &book_b {
            if let Some(leg) = Leg::of(prop.direction) {
                index
                    .entry((prop.canonical_key(), leg))
                    .or_default()
                    .push(prop);
            }
        }

        let mut pairs = Vec::new();
        for prop in &book_a {
            let Some(leg) = Leg::of(prop.direction) else {
                continue;
            };
            let Some(candidates) = index.get(&(prop.canonical_key(), leg.opposite())) else {
                continue;
            };

            for other in candidates {
                if self.config.require_distinct_sources
                    && prop.source.eq_ignore_ascii_case(&other.source)
                {
                    debug!(
                        source = %prop.source,
                        player = %prop.player,
                        market = %prop.market,
                        "Skipping pair quoted by a single source"
                    );
                    continue;
                }

                if let Some(pair) = MatchedPair::try_new(prop, other) {
                    debug!(
                        player = %pair.player(),
                        market = %pair.market(),
                        under_source = %pair.under.source,
                        under_line = %pair.under.line_label(),
                        at_least_source = %pair.at_least.source,
                        at_least_line = %pair.at_least.line_label(),
                        "Complementary lines matched"
                    );
                    pairs.push(pair);
                }
            }
        }

        info!(
            book_a_count = book_a.len(),
            book_b_count = book_b.len(),
            duplicates = dup_a + dup_b,
            matches_found = pairs.len(),
            "Cross-book matching complete"
        );

        MatchOutcome {
            pairs,
            duplicates: dup_a + dup_b,
        }
    }
}

/// Canonicalizes a book and keeps the first quote per line. Returns the kept
/// propositions and the number of duplicates dropped.
#[must_use]
pub fn dedupe(book: &[Proposition]) -> (Vec<Proposition>, usize) {
    let mut seen: HashSet<LineKey> = HashSet::new();
    let mut kept = Vec::with_capacity(book.len());
    let mut duplicates = 0;

    for prop in book {
        let canonical = prop.canonical();
        if seen.insert(canonical.line_key()) {
            kept.push(canonical);
        } else {
            duplicates += 1;
            warn!(
                source = %canonical.source,
                player = %canonical.player,
                market = %canonical.market,
                line = %canonical.line_label(),
                odds = %canonical.odds,
                "Duplicate line from one source; keeping first quote"
            );
        }
    }

    (kept, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use prop_arb_core::{Direction, MarketKind, OddsFraction, PlayerName};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn prop(
        source: &str,
        player: &str,
        market: MarketKind,
        direction: Direction,
        threshold: Decimal,
        odds: &str,
    ) -> Proposition {
        Proposition {
            player: PlayerName::new(player),
            market,
            direction,
            threshold,
            odds: OddsFraction::parse(odds).unwrap(),
            source: source.to_string(),
        }
    }

    fn bet365() -> Vec<Proposition> {
        vec![
            prop("bet365", "Callum Wilson", MarketKind::Shots, Direction::Under, dec!(0.5), "4/6"),
            prop("bet365", "Callum Wilson", MarketKind::Shots, Direction::Under, dec!(1.5), "1/2"),
            prop("bet365", "Jarrod Bowen", MarketKind::ShotsOnTarget, Direction::Under, dec!(0.5), "5/6"),
            prop("bet365", "Lucas Paqueta", MarketKind::Tackles, Direction::Under, dec!(1.5), "4/5"),
        ]
    }

    fn skybet() -> Vec<Proposition> {
        vec![
            prop("skybet", "callum wilson", MarketKind::Shots, Direction::AtLeast, dec!(1), "1/5"),
            prop("skybet", "Callum Wilson", MarketKind::Shots, Direction::AtLeast, dec!(2), "3/1"),
            prop("skybet", "Jarrod Bowen", MarketKind::ShotsOnTarget, Direction::AtLeast, dec!(2), "4/1"),
            prop("skybet", "Lucas Paqueta", MarketKind::Shots, Direction::AtLeast, dec!(2), "9/4"),
        ]
    }

    fn sort_key(pair: &MatchedPair) -> (CanonicalKey, String, String) {
        (
            pair.canonical_key(),
            pair.under.source.clone(),
            pair.at_least.source.clone(),
        )
    }

    // ==================== Matching Tests ====================

    #[test]
    fn test_under_half_matches_at_least_one() {
        let matcher = PropositionMatcher::new();
        let pairs = matcher.find_matches(&bet365(), &skybet());

        let first = pairs
            .iter()
            .find(|p| p.under.threshold == dec!(0.5) && p.market() == MarketKind::Shots)
            .expect("under 0.5 should match 1+");
        assert_eq!(first.at_least.threshold, dec!(1));
        assert_eq!(first.at_least.odds.to_string(), "1/5");
    }

    #[test]
    fn test_under_one_and_half_matches_at_least_two() {
        let matcher = PropositionMatcher::new();
        let pairs = matcher.find_matches(&bet365(), &skybet());

        let pair = pairs
            .iter()
            .find(|p| p.under.threshold == dec!(1.5) && p.market() == MarketKind::Shots)
            .expect("under 1.5 should match 2+");
        assert_eq!(pair.at_least.threshold, dec!(2));
        assert_eq!(pair.at_least.odds.to_string(), "3/1");
    }

    #[test]
    fn test_no_match_on_threshold_or_market_mismatch() {
        let matcher = PropositionMatcher::new();
        let pairs = matcher.find_matches(&bet365(), &skybet());

        // Bowen under 0.5 SOT vs 2+ SOT, Paqueta tackles vs shots.
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.market() == MarketKind::Shots));
    }

    #[test]
    fn test_matching_is_symmetric() {
        let matcher = PropositionMatcher::new();
        let mut forward = matcher.find_matches(&bet365(), &skybet());
        let mut backward = matcher.find_matches(&skybet(), &bet365());

        forward.sort_by_key(sort_key);
        backward.sort_by_key(sort_key);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_over_lines_are_canonicalized_before_matching() {
        let matcher = PropositionMatcher::new();
        let book_a = vec![prop(
            "bet365",
            "Callum Wilson",
            MarketKind::Shots,
            Direction::Under,
            dec!(1.5),
            "1/2",
        )];
        let book_b = vec![prop(
            "williamhill",
            "Callum Wilson",
            MarketKind::Shots,
            Direction::Over,
            dec!(1),
            "3/1",
        )];

        let pairs = matcher.find_matches(&book_a, &book_b);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].at_least.direction, Direction::AtLeast);
        assert_eq!(pairs[0].at_least.threshold, dec!(2));
    }

    #[test]
    fn test_empty_books() {
        let matcher = PropositionMatcher::new();
        assert!(matcher.find_matches(&[], &skybet()).is_empty());
        assert!(matcher.find_matches(&bet365(), &[]).is_empty());
    }

    // ==================== Source and Duplicate Tests ====================

    #[test]
    fn test_same_source_pairs_refused_by_default() {
        let book = vec![
            prop("bet365", "A", MarketKind::Shots, Direction::Under, dec!(0.5), "1/2"),
            prop("bet365", "A", MarketKind::Shots, Direction::AtLeast, dec!(1), "3/1"),
        ];
        let matcher = PropositionMatcher::new();
        assert!(matcher.find_matches(&book, &book).is_empty());

        let relaxed =
            PropositionMatcher::with_config(MatchConfig::default().with_distinct_sources(false));
        assert_eq!(relaxed.find_matches(&book, &book).len(), 2);
    }

    #[test]
    fn test_duplicate_lines_keep_first_quote() {
        let book_a = vec![
            prop("bet365", "A", MarketKind::Shots, Direction::Under, dec!(0.5), "1/2"),
            prop("bet365", "A", MarketKind::Shots, Direction::Under, dec!(0.50), "4/6"),
        ];
        let book_b = vec![prop("skybet", "A", MarketKind::Shots, Direction::AtLeast, dec!(1), "3/1")];

        let outcome = PropositionMatcher::new().match_books(&book_a, &book_b);
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(outcome.pairs.len(), 1);
        assert_eq!(outcome.pairs[0].under.odds.to_string(), "1/2");
    }

    #[test]
    fn test_dedupe_is_stable_on_deduped_book() {
        let book = vec![
            prop("bet365", "A", MarketKind::Shots, Direction::Under, dec!(0.5), "1/2"),
            prop("bet365", "a", MarketKind::Shots, Direction::Under, dec!(0.5), "4/6"),
            prop("bet365", "A", MarketKind::Shots, Direction::Over, dec!(0.5), "3/1"),
        ];

        let (kept, duplicates) = dedupe(&book);
        assert_eq!(duplicates, 1);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].direction, Direction::AtLeast);

        let (again, none) = dedupe(&kept);
        assert_eq!(none, 0);
        assert_eq!(again, kept);
    }

    #[test]
    fn test_match_config_builder() {
        let config = MatchConfig::default().with_distinct_sources(false);
        assert!(!config.require_distinct_sources);
        assert!(MatchConfig::default().require_distinct_sources);
    }
}
