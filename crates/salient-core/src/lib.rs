//! salient-core: Backend-independent grid types and table normalization.
//!
//! This crate provides the cell and grid types shared by every salient-rs
//! crate, the canonical [`CleanedTable`], and the [`TableNormalizer`] that
//! realigns a noisy extracted grid into that canonical form. It knows nothing
//! about PDF parsing.

pub mod cell;
pub mod cleaned;
pub mod error;
pub mod grid;
pub mod normalize;
pub mod sanitize;
pub mod settings;

pub use cell::{Cell, format_number};
pub use cleaned::{CleanedTable, TableRow};
pub use error::{SourceFailure, StructuralViolation, TableError};
pub use grid::RawGrid;
pub use normalize::{HeaderedGrid, TableNormalizer};
pub use sanitize::{ValueSanitizer, strip_non_printable};
pub use settings::{
    ANCHOR_PHRASE, FIRST_HEADER, NormalizeSettings, PROTECTED_LABELS, SECTION_LABEL,
};
