use anyhow::{Context, Result};
use prop_arb_core::{BookAdapter, RawRecord};
use tracing::debug;

/// Reads a JSON array of raw records.
///
/// ```json
/// [{"player": "Callum Wilson", "market": "Shots", "line": "2+", "odds": "3/1"}]
/// ```
#[derive(Debug, Clone)]
pub struct JsonAdapter {
    source: String,
}

impl JsonAdapter {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl BookAdapter for JsonAdapter {
    fn source(&self) -> &str {
        &self.source
    }

    fn parse(&self, raw_page: &str) -> Result<Vec<RawRecord>> {
        let mut records: Vec<RawRecord> = serde_json::from_str(raw_page)
            .with_context(|| format!("Failed to parse JSON book for {}", self.source))?;

        for record in &mut records {
            if record.source.trim().is_empty() {
                record.source.clone_from(&self.source);
            }
        }

        debug!(source = %self.source, records = records.len(), "Parsed JSON book");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_records() {
        let page = r#"[
            {"player": "Callum Wilson", "market": "Player Shots", "line": "2+", "odds": "3/1"},
            {"source": "other", "player": "Jarrod Bowen", "line": "Under 0.5 4/6"}
        ]"#;

        let records = JsonAdapter::new("betway").parse(page).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].source, "betway");
        assert_eq!(records[0].odds.as_deref(), Some("3/1"));
        assert_eq!(records[1].source, "other");
        assert_eq!(records[1].market, "");
        assert_eq!(records[1].odds, None);
    }

    #[test]
    fn test_parse_json_rejects_bad_page() {
        let err = JsonAdapter::new("betway").parse("{not json").unwrap_err();
        assert!(err.to_string().contains("betway"));
    }
}
