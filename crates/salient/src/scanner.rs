//! Keyword search across a page range.

use salient_core::{RawGrid, TableError};
use salient_parse::{ExtractionMode, GridSource};
use tracing::{debug, info};

/// Last page visited relative to the requested `page_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PageBound {
    /// Stop at `page_end`.
    #[default]
    Inclusive,
    /// Also visit `page_end + 1` when `page_start <= page_end`.
    Overscan,
}

/// Options for [`PageScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanOptions {
    /// How `page_end` bounds the scan.
    pub bound: PageBound,
}

/// What the scanner saw on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageVisit {
    /// 1-based page number.
    pub page: usize,
    /// Strict grids extracted from the page.
    pub grids: usize,
    /// Text cells containing the keyword.
    pub matches: usize,
}

/// Outcome of [`PageScanner::scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanReport {
    /// The keyword searched for.
    pub keyword: String,
    /// Pages visited, in order.
    pub visits: Vec<PageVisit>,
    /// First page with a match.
    pub found: Option<usize>,
}

/// Finds the first page whose strict-mode grids mention a keyword.
#[derive(Debug, Clone)]
pub struct PageScanner<S> {
    source: S,
    options: ScanOptions,
}

impl<S: GridSource> PageScanner<S> {
    /// Create a scanner with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, ScanOptions::default())
    }

    /// Create a scanner with custom options.
    pub fn with_options(source: S, options: ScanOptions) -> Self {
        Self { source, options }
    }

    /// The options in use.
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Last page to visit, clamped to the document.
    fn last_page(&self, page_start: usize, page_end: usize, page_count: usize) -> usize {
        let last = match self.options.bound {
            PageBound::Inclusive => page_end.max(page_start),
            PageBound::Overscan if page_start <= page_end => page_end + 1,
            PageBound::Overscan => page_start,
        };
        last.min(page_count)
    }

    /// Visit pages from `page_start` and report where `keyword` occurs.
    ///
    /// Matching is case-insensitive substring containment over every text
    /// cell. All grids of a page are examined; the scan stops after the
    /// first page with a match.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidSettings`] for `page_start == 0` and
    /// [`TableError::Extraction`] if the source fails on a visited page.
    pub fn scan(
        &self,
        keyword: &str,
        page_start: usize,
        page_end: usize,
        doc: &S::Document,
    ) -> Result<ScanReport, TableError> {
        if page_start == 0 {
            return Err(TableError::InvalidSettings(
                "pages are numbered from 1".to_string(),
            ));
        }

        let needle = keyword.to_lowercase();
        let last = self.last_page(page_start, page_end, self.source.page_count(doc));
        let mut report = ScanReport {
            keyword: keyword.to_string(),
            visits: Vec::new(),
            found: None,
        };

        for page in page_start..=last {
            let grids = self
                .source
                .extract(doc, page, ExtractionMode::Strict)
                .map_err(|e| TableError::extraction(page, e))?;
            let matches = count_matches(&grids, &needle);
            debug!(page, grids = grids.len(), matches, "scanned page");

            report.visits.push(PageVisit {
                page,
                grids: grids.len(),
                matches,
            });
            if matches > 0 {
                info!(page, keyword, "found keyword");
                report.found = Some(page);
                break;
            }
        }

        Ok(report)
    }

    /// First page in the range mentioning `keyword`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NotFound`] when no visited page matches, or any
    /// error of [`scan`](Self::scan).
    pub fn find_page(
        &self,
        keyword: &str,
        page_start: usize,
        page_end: usize,
        doc: &S::Document,
    ) -> Result<usize, TableError> {
        self.scan(keyword, page_start, page_end, doc)?
            .found
            .ok_or_else(|| TableError::NotFound {
                keyword: keyword.to_string(),
                page_start,
                page_end,
            })
    }
}

fn count_matches(grids: &[RawGrid], needle: &str) -> usize {
    grids
        .iter()
        .flat_map(RawGrid::cells)
        .filter_map(|cell| cell.as_text())
        .filter(|text| text.to_lowercase().contains(needle))
        .count()
}
