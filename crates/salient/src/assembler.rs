//! Table assembly across a page break.

use salient_core::{RawGrid, TableError};
use salient_parse::{ExtractionMode, GridSource};
use tracing::debug;

/// Options for [`TableAssembler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssembleOptions {
    /// Append the first table of the following page.
    pub stitch_continuation: bool,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            stitch_continuation: true,
        }
    }
}

/// Re-extracts the table page and stitches a continuation from the next page.
#[derive(Debug, Clone)]
pub struct TableAssembler<S> {
    source: S,
    options: AssembleOptions,
}

impl<S: GridSource> TableAssembler<S> {
    /// Create an assembler with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, AssembleOptions::default())
    }

    /// Create an assembler with custom options.
    pub fn with_options(source: S, options: AssembleOptions) -> Self {
        Self { source, options }
    }

    /// The options in use.
    pub fn options(&self) -> &AssembleOptions {
        &self.options
    }

    /// First lenient grid of `page`, if any.
    fn first_grid(&self, doc: &S::Document, page: usize) -> Result<Option<RawGrid>, TableError> {
        let grids = self
            .source
            .extract(doc, page, ExtractionMode::Lenient)
            .map_err(|e| TableError::extraction(page, e))?;
        Ok(grids.into_iter().next())
    }

    /// The table on `page`, with any table on `page + 1` appended below it.
    ///
    /// Any non-empty grid on the following page is treated as a
    /// continuation; rows are stacked and the narrower side is padded.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::NoTable`] if `page` yields no non-empty grid, and
    /// [`TableError::Extraction`] if the source fails.
    pub fn assemble(&self, doc: &S::Document, page: usize) -> Result<RawGrid, TableError> {
        let primary = self
            .first_grid(doc, page)?
            .filter(|grid| !grid.is_empty())
            .ok_or(TableError::NoTable { page })?;

        let next = page + 1;
        if !self.options.stitch_continuation || next > self.source.page_count(doc) {
            debug!(page, "no continuation probe");
            return Ok(primary);
        }

        match self.first_grid(doc, next)? {
            Some(continuation) if !continuation.is_empty() => {
                debug!(
                    page,
                    primary_rows = primary.n_rows(),
                    continuation_rows = continuation.n_rows(),
                    "stitching continuation"
                );
                Ok(primary.vstack(&continuation))
            }
            _ => {
                debug!(page = next, "no continuation table");
                Ok(primary)
            }
        }
    }
}
