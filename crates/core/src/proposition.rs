//! Player-prop data model shared by the normalizer, matcher and evaluator.

use std::fmt;
use std::hash::{Hash, Hasher};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::odds::OddsFraction;

// =============================================================================
// Raw Records
// =============================================================================

/// One row as delivered by a book adapter, before any interpretation.
///
/// `line` is free text such as `"Under 0.5 4/6"`, `"2+"` or
/// `"At Least 1 Shot On Target"`. When `odds` is absent the price is read
/// from `line`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Bookmaker label; opaque to the core.
    #[serde(default)]
    pub source: String,
    /// Player label as shown by the book.
    pub player: String,
    /// Market or section label (e.g. "Player Shots On Target Over/Under").
    #[serde(default)]
    pub market: String,
    /// Line text carrying direction and threshold, possibly the price too.
    pub line: String,
    /// Price text, when the book shows it separately from the line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odds: Option<String>,
}

impl RawRecord {
    /// Creates a record whose price is embedded in the line text.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        player: impl Into<String>,
        market: impl Into<String>,
        line: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            player: player.into(),
            market: market.into(),
            line: line.into(),
            odds: None,
        }
    }

    /// Sets a separately quoted price.
    #[must_use]
    pub fn with_odds(mut self, odds: impl Into<String>) -> Self {
        self.odds = Some(odds.into());
        self
    }
}

// =============================================================================
// Player Names
// =============================================================================

/// A player label in display form plus its case-folded comparison key.
///
/// Equality and hashing use the key only, so `"Callum  Wilson "` and
/// `"callum wilson"` are the same player.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PlayerName {
    display: String,
    key: String,
}

impl PlayerName {
    /// Trims and collapses internal whitespace.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let display = collapse_whitespace(raw);
        let key = display.to_lowercase();
        Self { display, key }
    }

    /// Like [`PlayerName::new`], additionally stripping one trailing
    /// boilerplate suffix such as `"To Commit"` (ASCII case-insensitive).
    #[must_use]
    pub fn with_suffixes<S: AsRef<str>>(raw: &str, suffixes: &[S]) -> Self {
        let mut display = collapse_whitespace(raw);
        for suffix in suffixes {
            let suffix = collapse_whitespace(suffix.as_ref());
            if suffix.is_empty() || display.len() <= suffix.len() {
                continue;
            }
            let split = display.len() - suffix.len();
            if !display.is_char_boundary(split) {
                continue;
            }
            let (head, tail) = display.split_at(split);
            if tail.eq_ignore_ascii_case(&suffix) && head.ends_with(' ') {
                display = head.trim_end().to_string();
                break;
            }
        }
        let key = display.to_lowercase();
        Self { display, key }
    }

    /// Display form with original casing.
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Comparison key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display.is_empty()
    }
}

impl PartialEq for PlayerName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PlayerName {}

impl Hash for PlayerName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl From<String> for PlayerName {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.display
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

// =============================================================================
// Markets
// =============================================================================

/// Statistic a player prop is settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketKind {
    /// Total shots.
    Shots,
    /// Shots on target.
    ShotsOnTarget,
    /// Fouls committed.
    FoulsCommitted,
    /// Tackles.
    Tackles,
}

impl MarketKind {
    /// Returns the display string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shots => "Shots",
            Self::ShotsOnTarget => "Shots On Target",
            Self::FoulsCommitted => "Fouls Committed",
            Self::Tackles => "Tackles",
        }
    }

    /// Recognises a market from a book's section or line label.
    ///
    /// Handles the phrasings seen across books, e.g.
    /// `"Player Shots On Target Over/Under"`, `"Player To Have 2+ Shots"`,
    /// `"Total Player Tackles"`, `"Player Fouls"`, `"1 Shot On Target"`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let lower = label.to_lowercase();
        if lower.contains("on target") {
            Some(Self::ShotsOnTarget)
        } else if lower.contains("shot") {
            Some(Self::Shots)
        } else if lower.contains("foul") {
            Some(Self::FoulsCommitted)
        } else if lower.contains("tackle") {
            Some(Self::Tackles)
        } else {
            None
        }
    }
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Directions
// =============================================================================

/// Comparison sense of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Count strictly above the (usually half-integer) line.
    Over,
    /// Count strictly below the line.
    Under,
    /// Count at or above a whole-number floor ("N+").
    AtLeast,
}

impl Direction {
    /// Returns the display string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Over => "over",
            Self::Under => "under",
            Self::AtLeast => "at_least",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Propositions
// =============================================================================

/// A single priced bet on a player statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
    /// Player the line is about.
    pub player: PlayerName,
    /// Statistic.
    pub market: MarketKind,
    /// Comparison sense.
    pub direction: Direction,
    /// Line value.
    pub threshold: Decimal,
    /// Quoted price.
    pub odds: OddsFraction,
    /// Book the quote came from.
    pub source: String,
}

/// Identity of a quoted line within one source.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub player: String,
    pub market: MarketKind,
    pub direction: Direction,
    pub threshold: Decimal,
}

/// Lookup key under which complementary lines from two books meet.
///
/// `at_least` is the whole-number count boundary: `under 1.5` and `2+` both
/// key on 2.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey {
    pub player: String,
    pub market: MarketKind,
    pub at_least: Decimal,
}

impl Proposition {
    /// Returns the canonical form: `over t` becomes `at_least floor(t)+1`,
    /// `at_least t` becomes `at_least ceil(t)`, `under t` is unchanged.
    ///
    /// Applying it twice yields the same proposition as applying it once.
    #[must_use]
    pub fn canonical(&self) -> Self {
        let (direction, threshold) = match self.direction {
            Direction::Over => (
                Direction::AtLeast,
                self.threshold.floor().saturating_add(Decimal::ONE),
            ),
            Direction::AtLeast => (Direction::AtLeast, self.threshold.ceil()),
            Direction::Under => (Direction::Under, self.threshold),
        };
        Self {
            direction,
            threshold: threshold.normalize(),
            ..self.clone()
        }
    }

    /// Smallest count that makes the "at least" side of this line win.
    #[must_use]
    pub fn at_least_boundary(&self) -> Decimal {
        match self.direction {
            Direction::Over => self.threshold.floor().saturating_add(Decimal::ONE),
            Direction::Under | Direction::AtLeast => self.threshold.ceil(),
        }
        .normalize()
    }

    /// Identity of this quote within its source.
    #[must_use]
    pub fn line_key(&self) -> LineKey {
        LineKey {
            player: self.player.key().to_string(),
            market: self.market,
            direction: self.direction,
            threshold: self.threshold.normalize(),
        }
    }

    /// Key used to find the complementary quote on another book.
    #[must_use]
    pub fn canonical_key(&self) -> CanonicalKey {
        CanonicalKey {
            player: self.player.key().to_string(),
            market: self.market,
            at_least: self.at_least_boundary(),
        }
    }

    /// Human-readable line, e.g. `"Under 1.5"` or `"2+"`.
    #[must_use]
    pub fn line_label(&self) -> String {
        let t = self.threshold.normalize();
        match self.direction {
            Direction::Over => format!("Over {t}"),
            Direction::Under => format!("Under {t}"),
            Direction::AtLeast => format!("{t}+"),
        }
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} {} @ {}",
            self.source,
            self.player,
            self.market,
            self.line_label(),
            self.odds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn prop(direction: Direction, threshold: Decimal) -> Proposition {
        Proposition {
            player: PlayerName::new("Callum Wilson"),
            market: MarketKind::Shots,
            direction,
            threshold,
            odds: OddsFraction::parse("4/6").unwrap(),
            source: "bet365".to_string(),
        }
    }

    // ==================== PlayerName Tests ====================

    #[test]
    fn test_player_name_collapses_whitespace() {
        let name = PlayerName::new("  Callum   Wilson ");
        assert_eq!(name.display(), "Callum Wilson");
        assert_eq!(name.key(), "callum wilson");
        assert_eq!(name, PlayerName::new("CALLUM WILSON"));
    }

    #[test]
    fn test_player_name_strips_suffix() {
        let suffixes = ["To Commit", "To Score"];
        let name = PlayerName::with_suffixes("Bruno Guimaraes To Commit", &suffixes);
        assert_eq!(name.display(), "Bruno Guimaraes");

        let name = PlayerName::with_suffixes("Ollie Watkins  to  score", &suffixes);
        assert_eq!(name.display(), "Ollie Watkins");
    }

    #[test]
    fn test_player_name_suffix_needs_word_boundary() {
        let name = PlayerName::with_suffixes("Mario Commit", &["Commit"]);
        assert_eq!(name.display(), "Mario");

        let name = PlayerName::with_suffixes("Tocommit", &["commit"]);
        assert_eq!(name.display(), "Tocommit");

        let name = PlayerName::with_suffixes("To Commit", &["To Commit"]);
        assert_eq!(name.display(), "To Commit");
    }

    #[test]
    fn test_player_name_serde_as_string() {
        let name = PlayerName::new("Jarrod  Bowen");
        assert_eq!(serde_json::to_string(&name).unwrap(), "\"Jarrod Bowen\"");
    }

    // ==================== MarketKind Tests ====================

    #[test]
    fn test_market_from_label() {
        assert_eq!(
            MarketKind::from_label("Player Shots On Target Over/Under"),
            Some(MarketKind::ShotsOnTarget)
        );
        assert_eq!(
            MarketKind::from_label("Player To Have 2+ Shots"),
            Some(MarketKind::Shots)
        );
        assert_eq!(
            MarketKind::from_label("At Least 1 Shot On Target"),
            Some(MarketKind::ShotsOnTarget)
        );
        assert_eq!(
            MarketKind::from_label("Player Fouls"),
            Some(MarketKind::FoulsCommitted)
        );
        assert_eq!(
            MarketKind::from_label("Total Player Tackles"),
            Some(MarketKind::Tackles)
        );
        assert_eq!(MarketKind::from_label("Player Offsides"), None);
    }

    // ==================== Proposition Tests ====================

    #[test]
    fn test_canonical_over_half_line() {
        let p = prop(Direction::Over, dec!(1.5)).canonical();
        assert_eq!(p.direction, Direction::AtLeast);
        assert_eq!(p.threshold, dec!(2));
    }

    #[test]
    fn test_canonical_over_whole_line() {
        let p = prop(Direction::Over, dec!(1)).canonical();
        assert_eq!(p.direction, Direction::AtLeast);
        assert_eq!(p.threshold, dec!(2));
    }

    #[test]
    fn test_canonical_under_unchanged() {
        let p = prop(Direction::Under, dec!(0.5)).canonical();
        assert_eq!(p.direction, Direction::Under);
        assert_eq!(p.threshold, dec!(0.5));
        assert_eq!(p.at_least_boundary(), dec!(1));
    }

    #[test]
    fn test_canonical_is_idempotent() {
        for (direction, threshold) in [
            (Direction::Over, dec!(0.5)),
            (Direction::Over, dec!(2)),
            (Direction::Under, dec!(1.5)),
            (Direction::AtLeast, dec!(3)),
            (Direction::AtLeast, dec!(1.5)),
        ] {
            let once = prop(direction, threshold).canonical();
            assert_eq!(once.canonical(), once);
        }
    }

    #[test]
    fn test_canonical_keys_meet() {
        let under = prop(Direction::Under, dec!(1.5));
        let at_least = prop(Direction::AtLeast, dec!(2.0));
        assert_eq!(under.canonical_key(), at_least.canonical_key());

        let under_half = prop(Direction::Under, dec!(0.5));
        assert_eq!(under_half.canonical_key().at_least, dec!(1));
    }

    #[test]
    fn test_canonical_over_at_decimal_limit_saturates() {
        let over = prop(Direction::Over, Decimal::MAX);
        assert_eq!(over.canonical().threshold, Decimal::MAX);
        assert_eq!(over.at_least_boundary(), Decimal::MAX);
    }

    #[test]
    fn test_line_label() {
        assert_eq!(prop(Direction::Under, dec!(1.5)).line_label(), "Under 1.5");
        assert_eq!(prop(Direction::AtLeast, dec!(2.0)).line_label(), "2+");
        assert_eq!(prop(Direction::Over, dec!(0.5)).line_label(), "Over 0.5");
    }
}
