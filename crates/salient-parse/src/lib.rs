//! salient-parse: Grid sources for salient-rs.
//!
//! This crate defines the [`GridSource`] trait the page scanner and table
//! assembler extract through, and ships [`LopdfGridSource`], a text-layout
//! extractor built on lopdf: content stream tokenizing, text placement and
//! line/column clustering. It depends on salient-core for the grid types.

pub mod error;
pub mod layout;
pub mod lopdf_source;
pub mod placement;
pub mod source;
pub mod tokenizer;

pub use error::SourceError;
pub use layout::LayoutSettings;
pub use lopdf_source::{LopdfDocument, LopdfGridSource};
pub use placement::TextRun;
pub use salient_core;
pub use source::{ExtractionMode, GridSource};
