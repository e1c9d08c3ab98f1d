//! Proposition normalization.
//!
//! Books phrase the same bet differently:
//!
//! ```text
//! bet365:        "Under 0.5 4/6"              (Player Shots On Target Over/Under)
//! Betway:        "Player To Have 1+ Shots On Target"  + "6/4"
//! Sky Bet:       "1+"                          + "6/4"   (ladder column)
//! William Hill:  "At Least 1 Shot On Target"   + "6/4"
//! ```
//!
//! The normalizer turns each raw row into a [`Proposition`] with an explicit
//! direction and threshold in canonical form, so rows from different books
//! can be keyed against each other.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

use prop_arb_core::{
    find_odds_token, Direction, MarketKind, NormalizerConfig, OddsFraction, PlayerName,
    PropError, PropResult, Proposition, RawRecord,
};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::types::RejectedRow;

// =============================================================================
// Line Parsing
// =============================================================================

fn under_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bunder\b").expect("under pattern compiles"))
}

fn over_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bover\b").expect("over pattern compiles"))
}

fn at_least_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\bat\s+least\b|\d+(?:\.\d+)?\s*\+").expect("at-least pattern compiles")
    })
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern compiles"))
}

/// Reads direction and raw threshold from line text with the price removed.
///
/// ```text
/// "Under 0.5"                 -> (Under, 0.5)
/// "2+"                        -> (AtLeast, 2)
/// "Over 1 Shot On Target"     -> (Over, 1)
/// "At Least 1 Shot On Target" -> (AtLeast, 1)
/// ```
///
/// # Errors
///
/// Returns [`PropError::UnparsableLine`] when no direction marker, more than
/// one kind of marker, or no number is present.
pub fn parse_line(text: &str) -> PropResult<(Direction, Decimal)> {
    let mut found = Vec::with_capacity(1);
    if under_re().is_match(text) {
        found.push(Direction::Under);
    }
    if over_re().is_match(text) {
        found.push(Direction::Over);
    }
    if at_least_re().is_match(text) {
        found.push(Direction::AtLeast);
    }

    let direction = match found.as_slice() {
        [direction] => *direction,
        [] => return Err(PropError::unparsable(text, "missing direction marker")),
        _ => return Err(PropError::unparsable(text, "conflicting direction markers")),
    };

    let number = number_re()
        .find(text)
        .ok_or_else(|| PropError::unparsable(text, "missing line value"))?;
    let threshold = Decimal::from_str(number.as_str())
        .map_err(|_| PropError::unparsable(text, "line value out of range"))?;
    // Canonicalization adds one to the floor of an over line.
    if threshold.floor().checked_add(Decimal::ONE).is_none() {
        return Err(PropError::unparsable(text, "line value out of range"));
    }

    Ok((direction, threshold))
}

// =============================================================================
// Normalized Batch
// =============================================================================

/// Result of normalizing one book's records.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizedBatch {
    /// Rows that became propositions, in input order.
    pub propositions: Vec<Proposition>,
    /// Rows that were skipped, with reasons.
    pub rejected: Vec<RejectedRow>,
}

impl NormalizedBatch {
    /// Total rows seen.
    #[must_use]
    pub fn rows_seen(&self) -> usize {
        self.propositions.len() + self.rejected.len()
    }
}

// =============================================================================
// Normalizer
// =============================================================================

/// Turns raw book rows into canonical propositions.
#[derive(Debug, Clone)]
pub struct PropositionNormalizer {
    config: NormalizerConfig,
    /// Lowercased alias label -> market.
    aliases: HashMap<String, MarketKind>,
}

impl PropositionNormalizer {
    /// Creates a normalizer with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(NormalizerConfig::default())
    }

    /// Creates a normalizer with custom configuration.
    #[must_use]
    pub fn with_config(config: NormalizerConfig) -> Self {
        let aliases = config
            .market_aliases
            .iter()
            .map(|(label, market)| (label.trim().to_lowercase(), *market))
            .collect();
        Self { config, aliases }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Resolves the market from configured aliases, then the record's market
    /// label, then the line text.
    ///
    /// # Errors
    ///
    /// Returns [`PropError::UnknownMarket`] when none of them names a market.
    pub fn resolve_market(&self, record: &RawRecord) -> PropResult<MarketKind> {
        let label = record.market.trim();
        if let Some(market) = self.aliases.get(&label.to_lowercase()) {
            return Ok(*market);
        }
        MarketKind::from_label(label)
            .or_else(|| MarketKind::from_label(&record.line))
            .ok_or_else(|| PropError::UnknownMarket {
                label: if label.is_empty() {
                    record.line.clone()
                } else {
                    label.to_string()
                },
            })
    }

    /// Normalizes one raw record.
    ///
    /// # Errors
    ///
    /// Returns a row-level error ([`PropError::MalformedOdds`],
    /// [`PropError::UnparsableLine`] or [`PropError::UnknownMarket`]).
    pub fn normalize(&self, record: &RawRecord) -> PropResult<Proposition> {
        let player = PlayerName::with_suffixes(&record.player, &self.config.player_suffixes);
        if player.is_empty() {
            return Err(PropError::unparsable(&record.player, "missing player name"));
        }

        let market = self.resolve_market(record)?;

        // The price may be quoted separately or embedded in the line; either
        // way the token is cut out before the threshold is read.
        let explicit_odds = record
            .odds
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let token = find_odds_token(&record.line);

        let (odds, line_text) = match (explicit_odds, token) {
            (Some(text), token) => {
                let odds = OddsFraction::parse(text)?;
                let line = match token {
                    Some((_, range)) => cut(&record.line, range),
                    None => record.line.clone(),
                };
                (odds, line)
            }
            (None, Some((parsed, range))) => (parsed?, cut(&record.line, range)),
            (None, None) => return Err(PropError::unparsable(&record.line, "missing odds")),
        };

        let (direction, threshold) =
            parse_line(&line_text).map_err(|err| match err {
                PropError::UnparsableLine { reason, .. } => {
                    PropError::unparsable(&record.line, reason)
                }
                other => other,
            })?;

        let proposition = Proposition {
            player,
            market,
            direction,
            threshold,
            odds,
            source: record.source.clone(),
        }
        .canonical();

        debug!(
            source = %proposition.source,
            player = %proposition.player,
            market = %proposition.market,
            line = %proposition.line_label(),
            odds = %proposition.odds,
            "Normalized proposition"
        );

        Ok(proposition)
    }

    /// Normalizes a batch. A bad row never stops the rest; each rejection is
    /// logged and returned.
    #[must_use]
    pub fn normalize_batch(&self, records: &[RawRecord]) -> NormalizedBatch {
        let mut batch = NormalizedBatch::default();

        for record in records {
            match self.normalize(record) {
                Ok(proposition) => batch.propositions.push(proposition),
                Err(err) => {
                    warn!(
                        source = %record.source,
                        player = %record.player,
                        line = %record.line,
                        error = %err,
                        "Rejected row"
                    );
                    batch.rejected.push(RejectedRow::new(record, err));
                }
            }
        }

        batch
    }
}

impl Default for PropositionNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Removes a byte range from `text`, leaving a single space in its place.
fn cut(text: &str, range: std::ops::Range<usize>) -> String {
    format!("{} {}", &text[..range.start], &text[range.end..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn record(line: &str) -> RawRecord {
        RawRecord::new("bet365", "Callum Wilson", "Player Shots Over/Under", line)
    }

    // ==================== parse_line Tests ====================

    #[test]
    fn test_parse_line_under() {
        assert_eq!(
            parse_line("Under 0.5").unwrap(),
            (Direction::Under, dec!(0.5))
        );
    }

    #[test]
    fn test_parse_line_plus_suffix() {
        assert_eq!(parse_line("2+").unwrap(), (Direction::AtLeast, dec!(2)));
        assert_eq!(
            parse_line("Player To Have 1+ Shots On Target").unwrap(),
            (Direction::AtLeast, dec!(1))
        );
    }

    #[test]
    fn test_parse_line_at_least_words() {
        assert_eq!(
            parse_line("At Least 1 Shot On Target").unwrap(),
            (Direction::AtLeast, dec!(1))
        );
        assert_eq!(
            parse_line("at  least 3 tackles").unwrap(),
            (Direction::AtLeast, dec!(3))
        );
    }

    #[test]
    fn test_parse_line_over() {
        assert_eq!(
            parse_line("Over 1 Shot On Target").unwrap(),
            (Direction::Over, dec!(1))
        );
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(matches!(
            parse_line("1.5 shots"),
            Err(PropError::UnparsableLine {
                reason: "missing direction marker",
                ..
            })
        ));
        assert!(matches!(
            parse_line("Over/Under 1.5"),
            Err(PropError::UnparsableLine {
                reason: "conflicting direction markers",
                ..
            })
        ));
        assert!(matches!(
            parse_line("Under"),
            Err(PropError::UnparsableLine {
                reason: "missing line value",
                ..
            })
        ));
    }

    // ==================== normalize Tests ====================

    #[test]
    fn test_normalize_embedded_odds() {
        let normalizer = PropositionNormalizer::new();
        let p = normalizer.normalize(&record("Under 0.5 4/6")).unwrap();

        assert_eq!(p.player.display(), "Callum Wilson");
        assert_eq!(p.market, MarketKind::Shots);
        assert_eq!(p.direction, Direction::Under);
        assert_eq!(p.threshold, dec!(0.5));
        assert_eq!(p.odds, OddsFraction::parse("4/6").unwrap());
        assert_eq!(p.source, "bet365");
    }

    #[test]
    fn test_normalize_evens() {
        let normalizer = PropositionNormalizer::new();
        let p = normalizer.normalize(&record("Under 1.5 EVS")).unwrap();
        assert_eq!(p.odds, OddsFraction::EVENS);
        assert_eq!(p.threshold, dec!(1.5));
    }

    #[test]
    fn test_normalize_separate_odds() {
        let normalizer = PropositionNormalizer::new();
        let raw = RawRecord::new("skybet", "Callum Wilson", "Player Total Shots", "2+")
            .with_odds("3/1");
        let p = normalizer.normalize(&raw).unwrap();

        assert_eq!(p.direction, Direction::AtLeast);
        assert_eq!(p.threshold, dec!(2));
        assert_eq!(p.odds.to_string(), "3/1");
    }

    #[test]
    fn test_normalize_over_canonicalizes() {
        let normalizer = PropositionNormalizer::new();

        let p = normalizer.normalize(&record("Over 1.5 10/11")).unwrap();
        assert_eq!(p.direction, Direction::AtLeast);
        assert_eq!(p.threshold, dec!(2));

        let raw = RawRecord::new("williamhill", "Callum Wilson", "", "Over 1 Shot On Target")
            .with_odds("5/6");
        let p = normalizer.normalize(&raw).unwrap();
        assert_eq!(p.market, MarketKind::ShotsOnTarget);
        assert_eq!(p.direction, Direction::AtLeast);
        assert_eq!(p.threshold, dec!(2));
    }

    #[test]
    fn test_normalize_strips_player_suffix() {
        let normalizer = PropositionNormalizer::new();
        let raw = RawRecord::new("skybet", " Bruno  Guimaraes To Commit", "Player Fouls Committed", "1+")
            .with_odds("4/5");
        let p = normalizer.normalize(&raw).unwrap();
        assert_eq!(p.player.display(), "Bruno Guimaraes");
        assert_eq!(p.market, MarketKind::FoulsCommitted);
    }

    #[test]
    fn test_normalize_market_alias() {
        let mut config = NormalizerConfig::default();
        config
            .market_aliases
            .insert("Player Attempts".to_string(), MarketKind::Shots);
        let normalizer = PropositionNormalizer::with_config(config);

        let raw = RawRecord::new("betway", "A Player", "player attempts", "1+").with_odds("1/3");
        assert_eq!(normalizer.normalize(&raw).unwrap().market, MarketKind::Shots);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = PropositionNormalizer::new();
        let p = normalizer.normalize(&record("Over 0.5 1/4")).unwrap();
        assert_eq!(p.canonical(), p);
    }

    #[test]
    fn test_normalize_errors() {
        let normalizer = PropositionNormalizer::new();

        assert!(matches!(
            normalizer.normalize(&record("Under 0.5")),
            Err(PropError::UnparsableLine {
                reason: "missing odds",
                ..
            })
        ));
        assert!(matches!(
            normalizer.normalize(&record("Under 0.5 4/0")),
            Err(PropError::MalformedOdds { .. })
        ));
        assert!(matches!(
            normalizer.normalize(&record("Under 0.5").with_odds("SUSP")),
            Err(PropError::MalformedOdds { .. })
        ));
        assert!(matches!(
            normalizer.normalize(&RawRecord::new("b", "X", "Corners", "Over 2.5 1/2")),
            Err(PropError::UnknownMarket { .. })
        ));
        assert!(matches!(
            normalizer.normalize(&RawRecord::new("b", "  ", "Shots", "Over 2.5 1/2")),
            Err(PropError::UnparsableLine {
                reason: "missing player name",
                ..
            })
        ));
    }

    #[test]
    fn test_normalize_rejects_line_at_decimal_limit() {
        let normalizer = PropositionNormalizer::new();
        let result = normalizer.normalize(&record("Over 79228162514264337593543950335 1/2"));
        assert!(matches!(
            result,
            Err(PropError::UnparsableLine {
                reason: "line value out of range",
                ..
            })
        ));

        let batch = normalizer.normalize_batch(&[
            record("Over 79228162514264337593543950335 1/2"),
            record("Under 0.5 4/6"),
        ]);
        assert_eq!(batch.propositions.len(), 1);
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].kind, "unparsable_line");
    }

    // ==================== normalize_batch Tests ====================

    #[test]
    fn test_normalize_batch_isolates_bad_rows() {
        let normalizer = PropositionNormalizer::new();
        let records = vec![
            record("Under 0.5 4/6"),
            record("Under 1.5 garbage"),
            record("Under 2.5 1/5"),
        ];

        let batch = normalizer.normalize_batch(&records);
        assert_eq!(batch.propositions.len(), 2);
        assert_eq!(batch.rejected.len(), 1);
        assert_eq!(batch.rejected[0].line, "Under 1.5 garbage");
        assert_eq!(batch.rejected[0].kind, "unparsable_line");
        assert_eq!(batch.rows_seen(), 3);
    }
}
