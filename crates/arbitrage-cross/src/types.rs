//! Shared types for cross-book arbitrage scans.
//!
//! This module defines the data structures passed between the normalizer,
//! matcher, evaluator and scan pipeline.

use prop_arb_core::{
    CanonicalKey, Direction, MarketKind, PlayerName, PropError, Proposition, RawRecord,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Legs
// =============================================================================

/// The two sides of a two-way player prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Leg {
    /// Stat stays below the line.
    Under,
    /// Stat reaches the whole-number floor.
    AtLeast,
}

impl Leg {
    /// Returns the opposite leg.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Under => Self::AtLeast,
            Self::AtLeast => Self::Under,
        }
    }

    /// Leg a canonical proposition belongs to. `Over` lines have no leg
    /// until canonicalized.
    #[must_use]
    pub fn of(direction: Direction) -> Option<Self> {
        match direction {
            Direction::Under => Some(Self::Under),
            Direction::AtLeast => Some(Self::AtLeast),
            Direction::Over => None,
        }
    }

    /// Returns the display string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Under => "UNDER",
            Self::AtLeast => "AT LEAST",
        }
    }
}

impl std::fmt::Display for Leg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Books
// =============================================================================

/// All raw records scraped from one bookmaker for one match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Book {
    /// Bookmaker label.
    pub source: String,
    /// Records; any record without a source is stamped with `source`.
    pub records: Vec<RawRecord>,
}

impl Book {
    /// Creates a book, filling in missing record sources.
    #[must_use]
    pub fn new(source: impl Into<String>, records: Vec<RawRecord>) -> Self {
        let source = source.into();
        let records = records
            .into_iter()
            .map(|mut r| {
                if r.source.trim().is_empty() {
                    r.source = source.clone();
                }
                r
            })
            .collect();
        Self { source, records }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Matched Pair
// =============================================================================

/// An `under` quote on one book and the complementary `at least` quote on
/// another.
///
/// Between them the two legs cover every outcome: `under 1.5` loses exactly
/// when `2+` wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPair {
    /// The `under` leg.
    pub under: Proposition,
    /// The `at least` leg.
    pub at_least: Proposition,
}

impl MatchedPair {
    /// Pairs two quotes if they are complementary: one `under`, one
    /// `at least` (after canonicalization), same player, market and count
    /// boundary.
    #[must_use]
    pub fn try_new(first: &Proposition, second: &Proposition) -> Option<Self> {
        let first = first.canonical();
        let second = second.canonical();
        if first.canonical_key() != second.canonical_key() {
            return None;
        }
        match (Leg::of(first.direction)?, Leg::of(second.direction)?) {
            (Leg::Under, Leg::AtLeast) => Some(Self {
                under: first,
                at_least: second,
            }),
            (Leg::AtLeast, Leg::Under) => Some(Self {
                under: second,
                at_least: first,
            }),
            _ => None,
        }
    }

    #[must_use]
    pub fn player(&self) -> &PlayerName {
        &self.under.player
    }

    #[must_use]
    pub fn market(&self) -> MarketKind {
        self.under.market
    }

    /// Whole-number count boundary shared by both legs.
    #[must_use]
    pub fn at_least_threshold(&self) -> Decimal {
        self.at_least.at_least_boundary()
    }

    #[must_use]
    pub fn canonical_key(&self) -> CanonicalKey {
        self.under.canonical_key()
    }

    /// Returns the proposition for a leg.
    #[must_use]
    pub fn leg(&self, leg: Leg) -> &Proposition {
        match leg {
            Leg::Under => &self.under,
            Leg::AtLeast => &self.at_least,
        }
    }
}

// =============================================================================
// Rejected Rows
// =============================================================================

/// A raw record the normalizer could not turn into a proposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRow {
    /// Bookmaker label.
    pub source: String,
    /// Raw player label.
    pub player: String,
    /// Raw line text.
    pub line: String,
    /// Error kind, e.g. `malformed_odds`.
    pub kind: &'static str,
    /// Human-readable reason.
    pub reason: String,
    /// Underlying error.
    #[serde(skip)]
    pub error: PropError,
}

impl RejectedRow {
    /// Records why `record` was rejected.
    #[must_use]
    pub fn new(record: &RawRecord, error: PropError) -> Self {
        Self {
            source: record.source.clone(),
            player: record.player.clone(),
            line: record.line.clone(),
            kind: error.kind(),
            reason: error.to_string(),
            error,
        }
    }
}
