//! Error types for the lopdf grid source.
//!
//! Uses [`thiserror`] for ergonomic error derivation. [`SourceError`] is the
//! `Error` type of [`LopdfGridSource`](crate::LopdfGridSource); the pipeline
//! wraps it in [`TableError::Extraction`](salient_core::TableError::Extraction)
//! without altering it.

use thiserror::Error;

/// Error type for grid extraction from PDF documents.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed page content stream.
    #[error("content stream error: {0}")]
    ContentStream(String),

    /// The document is encrypted.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The requested page does not exist.
    #[error("page {page} out of range (document has {page_count} pages)")]
    PageOutOfRange {
        /// Requested page (1-based).
        page: usize,
        /// Number of pages in the document.
        page_count: usize,
    },
}
