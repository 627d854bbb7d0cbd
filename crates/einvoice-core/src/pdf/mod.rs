//! PDF access layer.
//!
//! The extraction engine does not parse PDF bytes or detect table geometry
//! itself; it consumes page text and candidate table rows through the
//! [`DocumentSource`] trait. [`PdfSource`] is the lopdf/pdf-extract backed
//! implementation used by the pipeline; tests drive the engine with
//! in-memory fixture sources instead.

mod reader;

pub use reader::PdfSource;

use crate::error::PdfError;

/// Result type for PDF access operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// A candidate table: ordered rows of ordered cells, `None` where the grid
/// detector found an empty cell.
pub type Table = Vec<Vec<Option<String>>>;

/// Ordered access to a document's pages. Page numbers are 1-indexed.
pub trait DocumentSource {
    /// Number of pages in the document, at least 1.
    fn page_count(&self) -> u32;

    /// Plain text of one page.
    fn page_text(&self, page: u32) -> Result<String>;

    /// Candidate table rows detected on one page. May legitimately re-emit
    /// rows already seen on a neighboring page; the consumer deduplicates.
    fn page_tables(&self, page: u32) -> Result<Vec<Table>>;
}
