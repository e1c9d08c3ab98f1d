use anyhow::{Context, Result};
use prop_arb_core::{BookAdapter, RawRecord};
use serde::Deserialize;
use tracing::debug;

/// Reads CSV with `player,market,line,odds` headers. `odds` may be left
/// empty when the line text carries the price.
#[derive(Debug, Clone)]
pub struct CsvAdapter {
    source: String,
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    player: String,
    #[serde(default)]
    market: String,
    line: String,
    #[serde(default)]
    odds: Option<String>,
}

impl CsvAdapter {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl BookAdapter for CsvAdapter {
    fn source(&self) -> &str {
        &self.source
    }

    fn parse(&self, raw_page: &str) -> Result<Vec<RawRecord>> {
        let mut reader = ::csv::ReaderBuilder::new()
            .trim(::csv::Trim::All)
            .from_reader(raw_page.as_bytes());

        let mut records = Vec::new();
        for (i, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.with_context(|| {
                format!("Failed to read CSV row {} for {}", i + 1, self.source)
            })?;
            let record = RawRecord::new(self.source.as_str(), row.player, row.market, row.line);
            records.push(match row.odds.filter(|o| !o.is_empty()) {
                Some(odds) => record.with_odds(odds),
                None => record,
            });
        }

        debug!(source = %self.source, records = records.len(), "Parsed CSV book");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_records() {
        let page = "player,market,line,odds\n\
                    Callum Wilson,Player Shots,2+,3/1\n\
                    Jarrod Bowen,Player Shots On Target,Under 0.5 4/6,\n";

        let records = CsvAdapter::new("betway").parse(page).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source, "betway");
        assert_eq!(records[0].line, "2+");
        assert_eq!(records[0].odds.as_deref(), Some("3/1"));
        assert_eq!(records[1].odds, None);
    }

    #[test]
    fn test_parse_csv_missing_column_is_error() {
        let page = "player,odds\nCallum Wilson,3/1\n";
        assert!(CsvAdapter::new("betway").parse(page).is_err());
    }
}
