//! Error taxonomy for odds parsing, normalization and evaluation.
//!
//! Row-level errors ([`PropError::MalformedOdds`], [`PropError::UnparsableLine`],
//! [`PropError::UnknownMarket`]) reject a single record and never abort a batch.
//! [`PropError::InvalidStake`] is a hard error for the evaluation call that
//! received it.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors produced by the arbitrage core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropError {
    /// Odds text is not `n/d`, `EVS` or `EVENS`.
    #[error("malformed odds '{text}'")]
    MalformedOdds {
        /// Offending odds text.
        text: String,
    },

    /// Threshold or direction could not be read from the line text.
    #[error("unparsable line '{text}': {reason}")]
    UnparsableLine {
        /// Offending line text.
        text: String,
        /// What was missing or contradictory.
        reason: &'static str,
    },

    /// Market label does not name a known statistic.
    #[error("unknown market '{label}'")]
    UnknownMarket {
        /// Offending market label.
        label: String,
    },

    /// Bankroll passed to the evaluator is zero or negative.
    #[error("invalid stake {stake}: bankroll must be positive")]
    InvalidStake {
        /// Rejected bankroll.
        stake: Decimal,
    },

    /// Exact rational arithmetic left the representable range.
    #[error("arithmetic overflow while evaluating odds")]
    ArithmeticOverflow,
}

impl PropError {
    /// Creates an [`PropError::UnparsableLine`] error.
    #[must_use]
    pub fn unparsable(text: impl Into<String>, reason: &'static str) -> Self {
        Self::UnparsableLine {
            text: text.into(),
            reason,
        }
    }

    /// Returns true for errors that reject a single input row.
    #[must_use]
    pub fn is_row_level(&self) -> bool {
        matches!(
            self,
            Self::MalformedOdds { .. } | Self::UnparsableLine { .. } | Self::UnknownMarket { .. }
        )
    }

    /// Short machine-friendly label, used for counters and JSON output.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedOdds { .. } => "malformed_odds",
            Self::UnparsableLine { .. } => "unparsable_line",
            Self::UnknownMarket { .. } => "unknown_market",
            Self::InvalidStake { .. } => "invalid_stake",
            Self::ArithmeticOverflow => "arithmetic_overflow",
        }
    }
}

/// Convenience result alias for the core crates.
pub type PropResult<T> = Result<T, PropError>;
