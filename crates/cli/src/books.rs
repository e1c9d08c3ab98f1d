//! `--book SOURCE=FORMAT:PATH` arguments and book loading.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use prop_arb_cross::{adapter_for, AdapterKind, Book};

/// One book to load: who quoted it, which layout it uses, where it lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSpec {
    pub source: String,
    pub kind: AdapterKind,
    pub path: PathBuf,
}

impl FromStr for BookSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let usage = || format!("Invalid book '{s}'. Expected SOURCE=FORMAT:PATH, e.g. bet365=over-under:bet365.txt");

        let (source, rest) = s.split_once('=').ok_or_else(usage)?;
        let (kind, path) = rest.split_once(':').ok_or_else(usage)?;

        let source = source.trim();
        let path = path.trim();
        if source.is_empty() || path.is_empty() {
            return Err(usage());
        }

        Ok(Self {
            source: source.to_string(),
            kind: kind.parse()?,
            path: PathBuf::from(path),
        })
    }
}

impl fmt::Display for BookSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}:{}", self.source, self.kind, self.path.display())
    }
}

impl BookSpec {
    /// Reads the file and runs it through the matching adapter.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the page is structurally
    /// unreadable for its layout.
    pub fn load(&self) -> Result<Book> {
        let page = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read book file: {}", self.path.display()))?;

        let adapter = adapter_for(self.kind, self.source.as_str());
        let records = adapter
            .parse(&page)
            .with_context(|| format!("Failed to parse book {self}"))?;

        tracing::info!(
            source = %self.source,
            format = %self.kind,
            records = records.len(),
            "Loaded book"
        );

        Ok(Book::new(self.source.as_str(), records))
    }
}
