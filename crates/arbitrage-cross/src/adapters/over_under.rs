use anyhow::Result;
use prop_arb_core::{BookAdapter, RawRecord};
use tracing::debug;

use super::{cells, section_lines};

/// Over/under grid layout, one row per player:
///
/// ```text
/// # Player Shots On Target Over/Under
/// Jarrod Bowen | Over 0.5 10/11 | Under 0.5 4/6
/// ```
///
/// Every non-empty cell after the player becomes a record whose line text
/// carries the price.
#[derive(Debug, Clone)]
pub struct OverUnderAdapter {
    source: String,
}

impl OverUnderAdapter {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl BookAdapter for OverUnderAdapter {
    fn source(&self) -> &str {
        &self.source
    }

    fn parse(&self, raw_page: &str) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();

        for line in section_lines(raw_page) {
            let cells = cells(line.text);
            let Some((player, quotes)) = cells.split_first() else {
                continue;
            };

            let mut offered = quotes.iter().filter(|q| !q.is_empty()).peekable();
            if offered.peek().is_none() {
                // Surfaces as a rejected row downstream.
                records.push(RawRecord::new(self.source.as_str(), *player, line.market, ""));
                continue;
            }
            for quote in offered {
                records.push(RawRecord::new(
                    self.source.as_str(),
                    *player,
                    line.market,
                    *quote,
                ));
            }
        }

        debug!(source = %self.source, records = records.len(), "Parsed over/under book");
        Ok(records)
    }
}
