//! Two-way arbitrage evaluation and stake sizing.
//!
//! For a matched `under` / `at least` pair with decimal odds `d1` and `d2`,
//! the combined implied probability is `1/d1 + 1/d2`. Below one, splitting a
//! bankroll `S` as
//!
//! ```text
//! stake_under    = S * d2 / (d1 + d2)
//! stake_at_least = S - stake_under
//! ```
//!
//! pays `S * d1 * d2 / (d1 + d2)` whichever leg wins. Worked example:
//!
//! ```text
//! Under 1.5 @ 1/2 (d1 = 1.5)     2+ @ 3/1 (d2 = 4.0)
//! implied = 0.667 + 0.250 = 0.917
//! S = 100 -> 72.73 on under, 27.27 on 2+, payout 109.09, ROI 9.09%
//! ```
//!
//! The profitability gate is evaluated on exact rationals; `4/6` against
//! `6/4` is break-even and is never reported.

use chrono::{DateTime, Utc};
use prop_arb_core::{
    MarketKind, OddsFraction, PlayerName, PropError, PropResult, Rational, ScanConfig,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::types::MatchedPair;

// =============================================================================
// Evaluator Configuration
// =============================================================================

/// Configuration for arbitrage evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// ROI percentage an opportunity must strictly exceed.
    pub min_roi_pct: Decimal,

    /// Skip pairs whose fractional-odds product is not above one before
    /// doing the full calculation.
    pub product_prefilter: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            min_roi_pct: Decimal::ZERO,
            product_prefilter: true,
        }
    }
}

impl EvaluatorConfig {
    /// Sets the minimum ROI percentage.
    #[must_use]
    pub fn with_min_roi_pct(mut self, roi_pct: Decimal) -> Self {
        self.min_roi_pct = roi_pct;
        self
    }

    /// Enables or disables the fraction-product pre-filter.
    #[must_use]
    pub fn with_product_prefilter(mut self, enabled: bool) -> Self {
        self.product_prefilter = enabled;
        self
    }
}

impl From<&ScanConfig> for EvaluatorConfig {
    fn from(config: &ScanConfig) -> Self {
        Self {
            min_roi_pct: config.min_roi_pct,
            product_prefilter: config.product_prefilter,
        }
    }
}

// =============================================================================
// Arbitrage Opportunity
// =============================================================================

/// A guaranteed-profit stake split across a matched pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    /// The matched legs.
    pub pair: MatchedPair,

    // Prices
    /// Decimal odds of the under leg.
    pub under_decimal_odds: f64,
    /// Decimal odds of the at-least leg.
    pub at_least_decimal_odds: f64,
    /// Combined implied probability (below 1).
    pub implied_probability: f64,

    // Stakes
    /// Total stake split across both legs.
    pub bankroll: Decimal,
    /// Stake on the under leg.
    pub stake_under: Decimal,
    /// Stake on the at-least leg.
    pub stake_at_least: Decimal,

    // Returns
    /// Return whichever leg wins, stake included.
    pub payout: Decimal,
    /// `payout - bankroll`.
    pub profit: Decimal,
    /// Profit as a percentage of the bankroll.
    pub roi_pct: Decimal,

    /// When the opportunity was detected.
    pub detected_at: DateTime<Utc>,
}

impl ArbitrageOpportunity {
    #[must_use]
    pub fn player(&self) -> &PlayerName {
        self.pair.player()
    }

    #[must_use]
    pub fn market(&self) -> MarketKind {
        self.pair.market()
    }

    /// Returns true if the opportunity makes money.
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.profit > Decimal::ZERO
    }

    /// Payout if the under leg wins.
    #[must_use]
    pub fn payout_if_under(&self) -> Decimal {
        self.stake_under * decimal_odds(&self.pair.under.odds)
    }

    /// Payout if the at-least leg wins.
    #[must_use]
    pub fn payout_if_at_least(&self) -> Decimal {
        self.stake_at_least * decimal_odds(&self.pair.at_least.odds)
    }
}

fn decimal_odds(odds: &OddsFraction) -> Decimal {
    Decimal::ONE + Decimal::from(odds.numerator()) / Decimal::from(odds.denominator())
}

// =============================================================================
// Arbitrage Evaluator
// =============================================================================

/// Decides whether a matched pair is an arbitrage and sizes the stakes.
#[derive(Debug, Default)]
pub struct ArbitrageEvaluator {
    config: EvaluatorConfig,
}

impl ArbitrageEvaluator {
    /// Creates an evaluator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: EvaluatorConfig::default(),
        }
    }

    /// Creates an evaluator with custom configuration.
    #[must_use]
    pub fn with_config(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluates a matched pair for a bankroll.
    ///
    /// Returns `Ok(None)` when the pair is not profitable (break-even
    /// included).
    ///
    /// # Errors
    ///
    /// Returns [`PropError::InvalidStake`] for a zero or negative bankroll and
    /// [`PropError::ArithmeticOverflow`] if exact arithmetic overflows.
    pub fn evaluate(
        &self,
        pair: &MatchedPair,
        bankroll: Decimal,
    ) -> PropResult<Option<ArbitrageOpportunity>> {
        if bankroll <= Decimal::ZERO {
            return Err(PropError::InvalidStake { stake: bankroll });
        }

        let under_odds = &pair.under.odds;
        let at_least_odds = &pair.at_least.odds;

        trace!(
            player = %pair.player(),
            market = %pair.market(),
            under_odds = %under_odds,
            at_least_odds = %at_least_odds,
            "Checking pair for arbitrage"
        );

        if self.config.product_prefilter && under_odds.multiply(at_least_odds) <= Rational::ONE {
            trace!(
                product = %under_odds.multiply(at_least_odds),
                "No arbitrage - fractional odds product <= 1"
            );
            return Ok(None);
        }

        let implied = Self::combined_implied_probability(under_odds, at_least_odds)
            .ok_or(PropError::ArithmeticOverflow)?;
        if implied >= Rational::ONE {
            trace!(
                implied_probability = implied.to_f64(),
                "No arbitrage - combined implied probability >= 100%"
            );
            return Ok(None);
        }

        let d1 = under_odds.decimal_odds();
        let d2 = at_least_odds.decimal_odds();

        // payout / bankroll = d1*d2/(d1+d2) = 1 / implied
        let payout_ratio = implied.recip().ok_or(PropError::ArithmeticOverflow)?;
        let roi_ratio = payout_ratio
            .checked_sub(Rational::ONE)
            .ok_or(PropError::ArithmeticOverflow)?;
        let under_share = d1
            .checked_add(d2)
            .and_then(|sum| d2.checked_div(sum))
            .ok_or(PropError::ArithmeticOverflow)?;

        let roi_pct = to_decimal(roi_ratio)? * dec!(100);
        if roi_pct <= self.config.min_roi_pct {
            debug!(
                player = %pair.player(),
                roi_pct = %roi_pct,
                min_roi_pct = %self.config.min_roi_pct,
                "ROI at or below threshold"
            );
            return Ok(None);
        }

        let stake_under = bankroll
            .checked_mul(to_decimal(under_share)?)
            .ok_or(PropError::ArithmeticOverflow)?;
        let stake_at_least = bankroll - stake_under;
        let payout = bankroll
            .checked_mul(to_decimal(payout_ratio)?)
            .ok_or(PropError::ArithmeticOverflow)?;
        let profit = payout - bankroll;
        if profit <= Decimal::ZERO || stake_at_least <= Decimal::ZERO {
            debug!(
                player = %pair.player(),
                bankroll = %bankroll,
                profit = %profit,
                "Bankroll too small to realise the edge"
            );
            return Ok(None);
        }

        let opportunity = ArbitrageOpportunity {
            pair: pair.clone(),
            under_decimal_odds: under_odds.to_decimal(),
            at_least_decimal_odds: at_least_odds.to_decimal(),
            implied_probability: implied.to_f64(),
            bankroll,
            stake_under,
            stake_at_least,
            payout,
            profit,
            roi_pct,
            detected_at: Utc::now(),
        };

        info!(
            player = %pair.player(),
            market = %pair.market(),
            under_source = %pair.under.source,
            under_odds = %under_odds,
            at_least_source = %pair.at_least.source,
            at_least_odds = %at_least_odds,
            roi_pct = %opportunity.roi_pct.round_dp(2),
            stake_under = %opportunity.stake_under.round_dp(2),
            stake_at_least = %opportunity.stake_at_least.round_dp(2),
            profit = %opportunity.profit.round_dp(2),
            "Arbitrage opportunity detected"
        );

        Ok(Some(opportunity))
    }

    /// Combined implied probability `1/d1 + 1/d2` of two prices.
    #[must_use]
    pub fn combined_implied_probability(
        first: &OddsFraction,
        second: &OddsFraction,
    ) -> Option<Rational> {
        first
            .implied_probability()
            .checked_add(second.implied_probability())
    }

    /// Checks whether two complementary prices form an arbitrage.
    #[must_use]
    pub fn is_arbitrage_possible(first: &OddsFraction, second: &OddsFraction) -> bool {
        Self::combined_implied_probability(first, second)
            .is_some_and(|implied| implied < Rational::ONE)
    }
}

fn to_decimal(value: Rational) -> PropResult<Decimal> {
    value.to_decimal().ok_or(PropError::ArithmeticOverflow)
}

// =============================================================================
// Detection Result Summary
// =============================================================================

/// Summary of a scan for monitoring and reporting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionSummary {
    /// Raw rows read across all books.
    pub rows_seen: u32,
    /// Rows that became propositions.
    pub propositions: u32,
    /// Rows rejected during normalization.
    pub rejected_rows: u32,
    /// Quotes dropped as duplicate lines within one source.
    pub duplicate_lines: u32,
    /// Complementary pairs found.
    pub pairs_matched: u32,
    /// Pairs whose evaluation failed (arithmetic overflow).
    pub evaluation_failures: u32,
    /// Opportunities reported.
    pub opportunities: u32,
    /// Best opportunity found (if any).
    pub best_opportunity: Option<OpportunitySummary>,
    /// Sum of profit across all opportunities.
    pub total_potential_profit: Decimal,
}

impl DetectionSummary {
    /// Folds an opportunity into the summary.
    pub fn record(&mut self, opp: &ArbitrageOpportunity) {
        self.opportunities += 1;
        self.total_potential_profit += opp.profit;
        let better = self
            .best_opportunity
            .as_ref()
            .map_or(true, |best| opp.roi_pct > best.roi_pct);
        if better {
            self.best_opportunity = Some(OpportunitySummary::from(opp));
        }
    }
}

/// Summary of a single opportunity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpportunitySummary {
    /// Player display name.
    pub player: String,
    /// Market.
    pub market: MarketKind,
    /// Book taking the under leg.
    pub under_source: String,
    /// Book taking the at-least leg.
    pub at_least_source: String,
    /// ROI percentage.
    pub roi_pct: Decimal,
    /// Profit for the scanned bankroll.
    pub profit: Decimal,
}

impl From<&ArbitrageOpportunity> for OpportunitySummary {
    fn from(opp: &ArbitrageOpportunity) -> Self {
        Self {
            player: opp.player().display().to_string(),
            market: opp.market(),
            under_source: opp.pair.under.source.clone(),
            at_least_source: opp.pair.at_least.source.clone(),
            roi_pct: opp.roi_pct,
            profit: opp.profit,
        }
    }
}
