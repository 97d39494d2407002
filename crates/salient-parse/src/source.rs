//! Grid source trait.
//!
//! Defines the [`GridSource`] trait that abstracts page-to-grid table
//! extraction, so the page scanner and table assembler can run against any
//! extractor (the bundled [`LopdfGridSource`](crate::LopdfGridSource), an
//! external tool, or an in-memory fixture).

use salient_core::RawGrid;

/// How aggressively an extractor should infer table boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Capture surrounding titles and headings as grid rows, without header
    /// inference. Used for keyword search.
    Strict,
    /// Best-effort table boundary inference. Used once the page is known.
    #[default]
    Lenient,
}

/// Trait abstracting page-to-grid extraction.
///
/// # Usage
///
/// ```ignore
/// let doc = source.open(pdf_bytes)?;
/// let grids = source.extract(&doc, 7, ExtractionMode::Strict)?;
/// ```
pub trait GridSource {
    /// The opened document type.
    type Document;

    /// Extractor-specific error, passed through to callers unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Number of pages in the document.
    fn page_count(&self, doc: &Self::Document) -> usize;

    /// Extract zero or more grids from a 1-based `page`.
    ///
    /// Grids are returned in extractor-defined order.
    ///
    /// # Errors
    ///
    /// Returns an error if the page is missing or cannot be read.
    fn extract(
        &self,
        doc: &Self::Document,
        page: usize,
        mode: ExtractionMode,
    ) -> Result<Vec<RawGrid>, Self::Error>;
}

impl<S: GridSource + ?Sized> GridSource for &S {
    type Document = S::Document;
    type Error = S::Error;

    fn page_count(&self, doc: &Self::Document) -> usize {
        (**self).page_count(doc)
    }

    fn extract(
        &self,
        doc: &Self::Document,
        page: usize,
        mode: ExtractionMode,
    ) -> Result<Vec<RawGrid>, Self::Error> {
        (**self).extract(doc, page, mode)
    }
}
