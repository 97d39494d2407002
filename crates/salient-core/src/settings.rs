//! Configuration for table normalization.

/// Phrase that marks the true top-left cell of the table.
pub const ANCHOR_PHRASE: &str = "For the year ended";

/// Label of the first data row once the header is in place.
pub const SECTION_LABEL: &str = "Income statement and selected returns";

/// Header forced onto the label column.
pub const FIRST_HEADER: &str = "For the year ended 31 March";

/// Row labels that stand alone and are never merged with a neighbour.
pub const PROTECTED_LABELS: [&str; 3] = [
    "Income statement and selected returns",
    "Balance sheet",
    "table financial features and key statistics",
];

/// Configuration for [`TableNormalizer`](crate::TableNormalizer).
///
/// The defaults describe the "Salient features" ten-year review table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizeSettings {
    /// Text whose cell marks the origin of the table.
    pub anchor_phrase: String,
    /// Label the first data row must carry after header re-synchronization.
    pub section_label: String,
    /// Row labels excluded from wrapped-row merging.
    pub protected_labels: Vec<String>,
    /// Header written over the label column.
    pub first_header: String,
    /// Header fragment replaced by a `"{year} vs {year-1}"` comparison.
    pub change_marker: String,
    /// Header fragment that drops a whole column.
    pub dropped_header_marker: String,
    /// Characters kept in value cells, as the body of a regex character class.
    pub value_charset: String,
    /// Maximum number of leading rows re-synchronization may promote.
    ///
    /// `None` bounds the loop by the number of data rows.
    pub max_resync_rows: Option<usize>,
}

impl Default for NormalizeSettings {
    fn default() -> Self {
        Self {
            anchor_phrase: ANCHOR_PHRASE.to_string(),
            section_label: SECTION_LABEL.to_string(),
            protected_labels: PROTECTED_LABELS.iter().map(|s| s.to_string()).collect(),
            first_header: FIRST_HEADER.to_string(),
            change_marker: "% change".to_string(),
            dropped_header_marker: "nan".to_string(),
            value_charset: "0-9.,%x^".to_string(),
            max_resync_rows: None,
        }
    }
}

impl NormalizeSettings {
    /// Returns `true` if `label` is one of the protected row labels.
    pub fn is_protected(&self, label: &str) -> bool {
        let label = label.trim();
        self.protected_labels.iter().any(|p| p == label)
    }
}
