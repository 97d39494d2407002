//! lopdf-based grid source.
//!
//! Implements [`GridSource`] using the [lopdf](https://crates.io/crates/lopdf)
//! crate: page content streams are tokenized, text runs are placed, and the
//! runs are laid out on a grid.

use std::path::Path;

use salient_core::RawGrid;

use crate::error::SourceError;
use crate::layout::{LayoutSettings, build_grids};
use crate::placement::{TextRun, place_text};
use crate::source::{ExtractionMode, GridSource};
use crate::tokenizer::tokenize;

/// A parsed PDF document backed by lopdf.
pub struct LopdfDocument {
    inner: lopdf::Document,
    /// Page object ids in page order (index 0 is page 1).
    page_ids: Vec<lopdf::ObjectId>,
}

impl LopdfDocument {
    /// Access the underlying lopdf document.
    pub fn inner(&self) -> &lopdf::Document {
        &self.inner
    }
}

impl std::fmt::Debug for LopdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LopdfDocument")
            .field("page_count", &self.page_ids.len())
            .finish_non_exhaustive()
    }
}

/// Text-layout grid extractor for unencrypted PDFs with simple fonts.
///
/// # Example
///
/// ```ignore
/// use salient_parse::{ExtractionMode, GridSource, LopdfGridSource};
///
/// let source = LopdfGridSource::default();
/// let doc = source.open(&pdf_bytes)?;
/// let grids = source.extract(&doc, 1, ExtractionMode::Strict)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct LopdfGridSource {
    settings: LayoutSettings,
}

impl LopdfGridSource {
    /// Create a source with custom layout tolerances.
    pub fn new(settings: LayoutSettings) -> Self {
        Self { settings }
    }

    /// The layout tolerances in use.
    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Parse a document from bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Parse`] for malformed input and
    /// [`SourceError::Encrypted`] for encrypted documents.
    pub fn open(&self, bytes: &[u8]) -> Result<LopdfDocument, SourceError> {
        let inner = lopdf::Document::load_mem(bytes)
            .map_err(|e| SourceError::Parse(format!("failed to parse PDF: {e}")))?;

        if inner.is_encrypted() {
            return Err(SourceError::Encrypted);
        }

        // get_pages is keyed by 1-based page number
        let page_ids: Vec<lopdf::ObjectId> = inner.get_pages().values().copied().collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(pages = page_ids.len(), "opened PDF");

        Ok(LopdfDocument { inner, page_ids })
    }

    /// Read and parse a document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Io`] if the file cannot be read, otherwise as
    /// [`open`](Self::open).
    pub fn open_file(&self, path: impl AsRef<Path>) -> Result<LopdfDocument, SourceError> {
        let bytes = std::fs::read(path)?;
        self.open(&bytes)
    }

    /// Place every text run of a 1-based `page`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::PageOutOfRange`] for a missing page, or a
    /// parse/content error if the page cannot be read.
    pub fn text_runs(&self, doc: &LopdfDocument, page: usize) -> Result<Vec<TextRun>, SourceError> {
        let page_id = page
            .checked_sub(1)
            .and_then(|index| doc.page_ids.get(index))
            .copied()
            .ok_or(SourceError::PageOutOfRange {
                page,
                page_count: doc.page_ids.len(),
            })?;

        let page_dict = doc
            .inner
            .get_object(page_id)
            .and_then(|o| o.as_dict())
            .map_err(|e| SourceError::Parse(format!("failed to get page dictionary: {e}")))?;

        let content = page_content_bytes(&doc.inner, page_dict)?;
        let ops = tokenize(&content)?;
        Ok(place_text(&ops))
    }
}

impl GridSource for LopdfGridSource {
    type Document = LopdfDocument;
    type Error = SourceError;

    fn page_count(&self, doc: &LopdfDocument) -> usize {
        doc.page_ids.len()
    }

    fn extract(
        &self,
        doc: &LopdfDocument,
        page: usize,
        mode: ExtractionMode,
    ) -> Result<Vec<RawGrid>, SourceError> {
        let runs = self.text_runs(doc, page)?;
        let grids = build_grids(&runs, mode, &self.settings);

        #[cfg(feature = "tracing")]
        tracing::debug!(page, ?mode, runs = runs.len(), grids = grids.len(), "extracted grids");

        Ok(grids)
    }
}

/// Concatenated, decoded content stream bytes of a page.
///
/// A page without `/Contents` has empty content.
fn page_content_bytes(
    doc: &lopdf::Document,
    page_dict: &lopdf::Dictionary,
) -> Result<Vec<u8>, SourceError> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };

    match contents {
        lopdf::Object::Reference(id) => {
            let stream = doc
                .get_object(*id)
                .and_then(|o| o.as_stream())
                .map_err(|e| SourceError::Parse(format!("/Contents is not a stream: {e}")))?;
            decode_stream(stream)
        }
        lopdf::Object::Array(items) => {
            let mut content = Vec::new();
            for item in items {
                let stream = item
                    .as_reference()
                    .and_then(|id| doc.get_object(id))
                    .and_then(|o| o.as_stream())
                    .map_err(|e| {
                        SourceError::Parse(format!("/Contents array item is not a stream: {e}"))
                    })?;
                if !content.is_empty() {
                    content.push(b' ');
                }
                content.extend_from_slice(&decode_stream(stream)?);
            }
            Ok(content)
        }
        _ => Err(SourceError::Parse(
            "/Contents is not a reference or array".to_string(),
        )),
    }
}

fn decode_stream(stream: &lopdf::Stream) -> Result<Vec<u8>, SourceError> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| SourceError::Parse(format!("failed to decompress content stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}
