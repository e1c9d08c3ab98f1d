//! Book adapters: one per page layout.
//!
//! Each adapter receives page text that has already been pulled off the
//! site and splits it into [`RawRecord`]s. The text layouts use `# Market`
//! header lines to open a market section:
//!
//! ```text
//! # Player Shots On Target Over/Under
//! Jarrod Bowen | Over 0.5 10/11 | Under 0.5 4/6
//! ```

mod csv;
mod json;
mod ladder;
mod over_under;
mod selection;

use std::fmt;
use std::str::FromStr;

use prop_arb_core::BookAdapter;
use serde::{Deserialize, Serialize};

pub use self::csv::CsvAdapter;
pub use self::json::JsonAdapter;
pub use self::ladder::LadderAdapter;
pub use self::over_under::OverUnderAdapter;
pub use self::selection::SelectionAdapter;

/// Supported page layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterKind {
    /// JSON array of records.
    Json,
    /// CSV with `player,market,line,odds` headers.
    Csv,
    /// `Player | Over 0.5 10/11 | Under 0.5 4/6` rows.
    OverUnder,
    /// `Player | 1/2 | 3/1` rows, column i is the `i+` line.
    Ladder,
    /// `Player Over 2 Shots 5/6` selection rows.
    Selection,
}

impl AdapterKind {
    pub const ALL: [Self; 5] = [
        Self::Json,
        Self::Csv,
        Self::OverUnder,
        Self::Ladder,
        Self::Selection,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::OverUnder => "over-under",
            Self::Ladder => "ladder",
            Self::Selection => "selection",
        }
    }
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AdapterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "over-under" | "overunder" => Ok(Self::OverUnder),
            "ladder" => Ok(Self::Ladder),
            "selection" => Ok(Self::Selection),
            _ => Err(format!(
                "Invalid format '{s}'. Valid options: json, csv, over-under, ladder, selection"
            )),
        }
    }
}

/// Builds the adapter for a layout.
#[must_use]
pub fn adapter_for(kind: AdapterKind, source: impl Into<String>) -> Box<dyn BookAdapter> {
    let source = source.into();
    match kind {
        AdapterKind::Json => Box::new(JsonAdapter::new(source)),
        AdapterKind::Csv => Box::new(CsvAdapter::new(source)),
        AdapterKind::OverUnder => Box::new(OverUnderAdapter::new(source)),
        AdapterKind::Ladder => Box::new(LadderAdapter::new(source)),
        AdapterKind::Selection => Box::new(SelectionAdapter::new(source)),
    }
}

// =============================================================================
// Sectioned text pages
// =============================================================================

/// A content line under a `# Market` header.
struct SectionLine<'a> {
    market: &'a str,
    text: &'a str,
}

/// Walks a sectioned page, skipping blank lines and headers. Lines before the
/// first header carry an empty market.
fn section_lines(page: &str) -> impl Iterator<Item = SectionLine<'_>> {
    let mut market = "";
    page.lines().filter_map(move |line| {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if let Some(header) = line.strip_prefix('#') {
            market = header.trim();
            return None;
        }
        Some(SectionLine { market, text: line })
    })
}

/// Splits a `|`-separated row into trimmed cells.
fn cells(row: &str) -> Vec<&str> {
    row.split('|').map(str::trim).collect()
}
