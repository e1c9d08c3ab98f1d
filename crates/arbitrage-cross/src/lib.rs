//! Cross-book player-prop arbitrage detection.
//!
//! This crate finds guaranteed-profit stake splits between bookmakers that
//! price the same player proposition from opposite sides.
//!
//! # Overview
//!
//! One book quotes the under, another quotes the whole-number "at least"
//! ladder. When the two prices disagree enough, backing both covers every
//! outcome at a profit:
//!
//! ```text
//! bet365:  Callum Wilson Shots  Under 1.5  @ 1/2
//! Sky Bet: Callum Wilson Shots  2+         @ 3/1
//!
//! Cross-book opportunity (stake 100):
//!   Back under 1.5 @ 1/2     72.73
//!   Back 2+        @ 3/1     27.27
//!   Payout either way:      109.09
//!   Profit:                   9.09 (9.09%)
//! ```
//!
//! # Modules
//!
//! - [`types`]: Books, legs, matched pairs and rejected rows
//! - [`adapters`]: Turn page text from each book layout into raw records
//! - [`normalizer`]: Raw records to canonical propositions
//! - [`matcher`]: Pair complementary propositions across books
//! - [`detector`]: Profitability gate and stake sizing
//! - [`scanner`]: The whole pipeline over a set of books
//!
//! # Example
//!
//! ```ignore
//! use prop_arb_cross::{adapter_for, AdapterKind, ArbitrageScanner, Book};
//! use rust_decimal_macros::dec;
//!
//! let bet365 = adapter_for(AdapterKind::OverUnder, "bet365");
//! let skybet = adapter_for(AdapterKind::Ladder, "skybet");
//!
//! let book_a = Book::new("bet365", bet365.parse(&bet365_page)?);
//! let book_b = Book::new("skybet", skybet.parse(&skybet_page)?);
//!
//! let report = ArbitrageScanner::new().scan(&book_a, &book_b, dec!(100))?;
//! for opp in &report.opportunities {
//!     println!("{} {} ROI {}%", opp.player(), opp.market(), opp.roi_pct.round_dp(2));
//! }
//! ```
//!
//! # Matching rules
//!
//! Counts are whole numbers, so `under 1.5` and `2+` are exact complements.
//! `over t` is read as `at least floor(t) + 1` before matching. Two quotes
//! from the same source are never paired unless explicitly allowed.

pub mod adapters;
pub mod detector;
pub mod matcher;
pub mod normalizer;
pub mod scanner;
pub mod types;

// Re-export main types for convenience
pub use adapters::{
    adapter_for, AdapterKind, CsvAdapter, JsonAdapter, LadderAdapter, OverUnderAdapter,
    SelectionAdapter,
};
pub use detector::{
    ArbitrageEvaluator, ArbitrageOpportunity, DetectionSummary, EvaluatorConfig,
    OpportunitySummary,
};
pub use matcher::{dedupe, MatchConfig, MatchOutcome, PropositionMatcher};
pub use normalizer::{parse_line, NormalizedBatch, PropositionNormalizer};
pub use scanner::{ArbitrageScanner, ScanReport};
pub use types::{Book, Leg, MatchedPair, RejectedRow};
