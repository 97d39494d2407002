//! Error types for table location and normalization.
//!
//! Uses [`thiserror`] for derivation. [`TableError`] is the single failure
//! type of the pipeline; callers receive either a finished table or one of
//! its variants, never a partial result.

use thiserror::Error;

/// Boxed error produced by a grid extractor.
pub type SourceFailure = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Fatal errors raised while locating or normalizing a table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The keyword did not appear on any scanned page.
    #[error("keyword {keyword:?} not found on pages {page_start}-{page_end}")]
    NotFound {
        /// Keyword that was searched for.
        keyword: String,
        /// First page of the requested range (1-based).
        page_start: usize,
        /// Last page of the requested range (1-based).
        page_end: usize,
    },

    /// The extractor returned no usable grid for a page.
    #[error("no table found on page {page}")]
    NoTable {
        /// Page that was re-extracted (1-based).
        page: usize,
    },

    /// The grid does not follow the expected table convention.
    #[error("structural assumption violated: {0}")]
    StructuralAssumptionViolated(StructuralViolation),

    /// The grid extractor failed; the original error is kept as the source.
    #[error("grid extraction failed on page {page}")]
    Extraction {
        /// Page being extracted (1-based).
        page: usize,
        /// The extractor's own error.
        #[source]
        source: SourceFailure,
    },

    /// Normalization settings could not be compiled.
    #[error("invalid normalize settings: {0}")]
    InvalidSettings(String),
}

impl TableError {
    /// Wrap an extractor failure for `page`.
    pub fn extraction(page: usize, source: impl Into<SourceFailure>) -> Self {
        TableError::Extraction {
            page,
            source: source.into(),
        }
    }
}

impl From<StructuralViolation> for TableError {
    fn from(violation: StructuralViolation) -> Self {
        TableError::StructuralAssumptionViolated(violation)
    }
}

/// Which structural assumption a grid failed to meet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralViolation {
    /// No cell contains the anchor phrase.
    #[error("anchor phrase {phrase:?} not found in grid")]
    MissingAnchor {
        /// The phrase searched for.
        phrase: String,
    },
    /// The section label never became the first data row.
    #[error("row label {label:?} not found within the first {examined} rows")]
    MissingSectionLabel {
        /// The label searched for.
        label: String,
        /// Number of rows examined before giving up.
        examined: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message() {
        let err = TableError::NotFound {
            keyword: "dividend".to_string(),
            page_start: 5,
            page_end: 10,
        };
        assert_eq!(
            err.to_string(),
            "keyword \"dividend\" not found on pages 5-10"
        );
    }

    #[test]
    fn structural_violation_converts() {
        let err: TableError = StructuralViolation::MissingAnchor {
            phrase: "For the year ended".to_string(),
        }
        .into();
        assert!(matches!(err, TableError::StructuralAssumptionViolated(_)));
        assert!(err.to_string().contains("For the year ended"));
    }

    #[test]
    fn extraction_keeps_original_source() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad xref");
        let err = TableError::extraction(3, io);
        assert_eq!(err.to_string(), "grid extraction failed on page 3");

        let source = std::error::Error::source(&err).expect("source kept");
        let original = source
            .downcast_ref::<std::io::Error>()
            .expect("original error type");
        assert_eq!(original.kind(), std::io::ErrorKind::InvalidData);
    }

    #[test]
    fn table_error_implements_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(TableError::NoTable { page: 4 });
        assert!(err.to_string().contains("page 4"));
    }
}
