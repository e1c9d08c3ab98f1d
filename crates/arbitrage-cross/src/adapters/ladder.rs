use anyhow::Result;
use prop_arb_core::{BookAdapter, RawRecord};
use tracing::debug;

use super::{cells, section_lines};

/// Ladder layout: column `i` after the player holds the `i+` price.
///
/// ```text
/// # Player Shots
/// Callum Wilson | 1/5 | 3/1 | 8/1
/// Jarrod Bowen  | 4/9 | -   | 6/1
/// ```
///
/// Empty and `-` cells are not offered and produce no record.
#[derive(Debug, Clone)]
pub struct LadderAdapter {
    source: String,
}

impl LadderAdapter {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

fn is_offered(cell: &str) -> bool {
    !cell.is_empty() && cell != "-"
}

impl BookAdapter for LadderAdapter {
    fn source(&self) -> &str {
        &self.source
    }

    fn parse(&self, raw_page: &str) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();

        for line in section_lines(raw_page) {
            let cells = cells(line.text);
            let Some((player, prices)) = cells.split_first() else {
                continue;
            };

            let before = records.len();
            for (i, price) in prices.iter().enumerate() {
                if !is_offered(price) {
                    continue;
                }
                records.push(
                    RawRecord::new(self.source.as_str(), *player, line.market, format!("{}+", i + 1))
                        .with_odds(*price),
                );
            }
            if records.len() == before {
                records.push(RawRecord::new(self.source.as_str(), *player, line.market, ""));
            }
        }

        debug!(source = %self.source, records = records.len(), "Parsed ladder book");
        Ok(records)
    }
}
