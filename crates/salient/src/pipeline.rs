//! One-call locate, assemble and normalize.

use salient_core::{CleanedTable, TableError, TableNormalizer};
use salient_parse::GridSource;
use tracing::info;

use crate::assembler::{AssembleOptions, TableAssembler};
use crate::scanner::{PageScanner, ScanOptions};

/// A normalized table and the page it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExtractedTable {
    /// 1-based page where the keyword was found.
    pub page: usize,
    /// The cleaned table.
    pub table: CleanedTable,
}

/// Runs [`PageScanner`], [`TableAssembler`] and [`TableNormalizer`] in turn.
///
/// # Example
///
/// ```ignore
/// use salient::{LopdfGridSource, SalientTableExtractor};
///
/// let source = LopdfGridSource::default();
/// let doc = source.open_file("annual-report.pdf")?;
/// let extractor = SalientTableExtractor::new(source)?;
/// let found = extractor.extract(&doc, "Salient features", 5, 10, 2019)?;
/// println!("page {}: {:?}", found.page, found.table.headers());
/// ```
#[derive(Debug, Clone)]
pub struct SalientTableExtractor<S> {
    source: S,
    scan_options: ScanOptions,
    assemble_options: AssembleOptions,
    normalizer: TableNormalizer,
}

impl<S: GridSource> SalientTableExtractor<S> {
    /// Create an extractor with default settings.
    ///
    /// # Errors
    ///
    /// Fails only if the default value charset does not compile.
    pub fn new(source: S) -> Result<Self, TableError> {
        Ok(Self {
            source,
            scan_options: ScanOptions::default(),
            assemble_options: AssembleOptions::default(),
            normalizer: TableNormalizer::with_defaults()?,
        })
    }

    /// Replace the scan options.
    pub fn with_scan_options(mut self, options: ScanOptions) -> Self {
        self.scan_options = options;
        self
    }

    /// Replace the assemble options.
    pub fn with_assemble_options(mut self, options: AssembleOptions) -> Self {
        self.assemble_options = options;
        self
    }

    /// Replace the normalizer.
    pub fn with_normalizer(mut self, normalizer: TableNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// The grid source in use.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Locate `keyword` in `page_start..=page_end`, assemble the table there
    /// and normalize it for `year`.
    ///
    /// # Errors
    ///
    /// Any error of [`PageScanner::find_page`], [`TableAssembler::assemble`]
    /// or [`TableNormalizer::normalize`]; no partial table is returned.
    pub fn extract(
        &self,
        doc: &S::Document,
        keyword: &str,
        page_start: usize,
        page_end: usize,
        year: i32,
    ) -> Result<ExtractedTable, TableError> {
        let page = PageScanner::with_options(&self.source, self.scan_options)
            .find_page(keyword, page_start, page_end, doc)?;
        let grid = TableAssembler::with_options(&self.source, self.assemble_options)
            .assemble(doc, page)?;
        let table = self.normalizer.normalize(&grid, year)?;

        info!(
            page,
            rows = table.n_rows(),
            columns = table.n_cols(),
            "extracted table"
        );
        Ok(ExtractedTable { page, table })
    }
}
