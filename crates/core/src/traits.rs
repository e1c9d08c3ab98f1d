use crate::proposition::RawRecord;
use anyhow::Result;

/// Turns one bookmaker's already-extracted page text into raw records.
///
/// One implementation per page layout. Adapters only split text into
/// fields; interpreting lines and prices is the normalizer's job, so a row
/// with odd content is still returned and rejected (with a reason) later.
pub trait BookAdapter: Send + Sync {
    /// Source label stamped on every record.
    fn source(&self) -> &str;

    /// Parses a page.
    ///
    /// # Errors
    ///
    /// Returns an error only when the page as a whole is unreadable.
    fn parse(&self, raw_page: &str) -> Result<Vec<RawRecord>>;
}
