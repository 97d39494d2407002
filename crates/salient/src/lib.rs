//! salient: Locate and normalize the "Salient features" table of a financial
//! report.
//!
//! This is the public API facade crate for salient-rs. It re-exports types
//! from salient-core and salient-parse and adds the page scanner, the table
//! assembler and the one-call pipeline.
//!
//! # Architecture
//!
//! - **salient-core**: grid types, [`CleanedTable`] and the [`TableNormalizer`]
//! - **salient-parse**: the [`GridSource`] trait and the lopdf-backed
//!   [`LopdfGridSource`]
//! - **salient** (this crate): [`PageScanner`] → [`TableAssembler`] →
//!   [`TableNormalizer`], wired together by [`SalientTableExtractor`]
//!
//! # Example
//!
//! ```ignore
//! use salient::{LopdfGridSource, assemble, find_page, normalize};
//!
//! let source = LopdfGridSource::default();
//! let doc = source.open_file("annual-report.pdf")?;
//! let page = find_page(&source, "Salient features", 5, 10, &doc)?;
//! let grid = assemble(&source, &doc, page)?;
//! let table = normalize(&grid, 2019)?;
//! ```

pub mod assembler;
pub mod pipeline;
pub mod scanner;

pub use assembler::{AssembleOptions, TableAssembler};
pub use pipeline::{ExtractedTable, SalientTableExtractor};
pub use scanner::{PageBound, PageScanner, PageVisit, ScanOptions, ScanReport};

pub use salient_core;
pub use salient_core::{
    Cell, CleanedTable, NormalizeSettings, RawGrid, StructuralViolation, TableError,
    TableNormalizer, TableRow,
};
pub use salient_parse;
pub use salient_parse::{
    ExtractionMode, GridSource, LayoutSettings, LopdfDocument, LopdfGridSource, SourceError,
};

/// First page in `page_start..=page_end` whose strict grids mention
/// `keyword`, using default [`ScanOptions`].
///
/// # Errors
///
/// See [`PageScanner::find_page`].
pub fn find_page<S: GridSource>(
    source: &S,
    keyword: &str,
    page_start: usize,
    page_end: usize,
    doc: &S::Document,
) -> Result<usize, TableError> {
    PageScanner::new(source).find_page(keyword, page_start, page_end, doc)
}

/// The table on `page`, stitched with a continuation on the next page.
///
/// # Errors
///
/// See [`TableAssembler::assemble`].
pub fn assemble<S: GridSource>(
    source: &S,
    doc: &S::Document,
    page: usize,
) -> Result<RawGrid, TableError> {
    TableAssembler::new(source).assemble(doc, page)
}

/// Normalize `grid` for `year` with [`NormalizeSettings::default`].
///
/// # Errors
///
/// See [`TableNormalizer::normalize`].
pub fn normalize(grid: &RawGrid, year: i32) -> Result<CleanedTable, TableError> {
    TableNormalizer::with_defaults()?.normalize(grid, year)
}
