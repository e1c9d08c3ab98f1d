use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::proposition::MarketKind;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub normalizer: NormalizerConfig,
    pub report: ReportConfig,
}

/// Evaluation and matching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Total stake split across both legs.
    pub bankroll: Decimal,
    /// Opportunities must beat this ROI percentage (strictly).
    pub min_roi_pct: Decimal,
    /// Skip pairs whose fractional-odds product is not above one.
    pub product_prefilter: bool,
    /// Never pair two quotes carrying the same source label.
    pub require_distinct_sources: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            bankroll: Decimal::ONE_HUNDRED,
            min_roi_pct: Decimal::ZERO,
            product_prefilter: true,
            require_distinct_sources: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Boilerplate some books append to player labels.
    pub player_suffixes: Vec<String>,
    /// Extra market labels, matched case-insensitively before the built-in rules.
    pub market_aliases: HashMap<String, MarketKind>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            player_suffixes: vec!["To Commit".to_string(), "To Score".to_string()],
            market_aliases: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub currency_symbol: String,
    pub decimal_places: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "£".to_string(),
            decimal_places: 2,
        }
    }
}
