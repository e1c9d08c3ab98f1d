use std::sync::OnceLock;

use anyhow::Result;
use prop_arb_core::{BookAdapter, RawRecord};
use regex::Regex;
use tracing::debug;

use super::{cells, section_lines};

fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:over|under|at\s+least)\b|\b\d+(?:\.\d+)?\s*\+")
            .expect("direction marker pattern compiles")
    })
}

/// Selection-list layout: each row is one selection naming the player and
/// the line, with the price inline or in a second `|` cell.
///
/// ```text
/// # Player To Have Shots
/// Callum Wilson Over 2 Shots 5/6
/// James Ward-Prowse At Least 1 Shot On Target | 11/10
/// ```
///
/// The player is everything before the first direction marker.
#[derive(Debug, Clone)]
pub struct SelectionAdapter {
    source: String,
}

impl SelectionAdapter {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Splits `"Callum Wilson Over 2 Shots"` into player and line text. Without
/// a marker the whole selection is kept as both, to be rejected later.
fn split_selection(selection: &str) -> (&str, &str) {
    match marker_re().find(selection) {
        Some(m) if m.start() > 0 => (selection[..m.start()].trim(), &selection[m.start()..]),
        _ => (selection, selection),
    }
}

impl BookAdapter for SelectionAdapter {
    fn source(&self) -> &str {
        &self.source
    }

    fn parse(&self, raw_page: &str) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();

        for line in section_lines(raw_page) {
            let cells = cells(line.text);
            let Some((selection, rest)) = cells.split_first() else {
                continue;
            };

            let (player, line_text) = split_selection(selection);
            let record = RawRecord::new(self.source.as_str(), player, line.market, line_text);
            records.push(match rest.iter().find(|c| !c.is_empty()) {
                Some(price) => record.with_odds(*price),
                None => record,
            });
        }

        debug!(source = %self.source, records = records.len(), "Parsed selection book");
        Ok(records)
    }
}
