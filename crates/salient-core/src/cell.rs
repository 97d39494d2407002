//! Heterogeneously typed grid cells.
//!
//! Grid extractors do not declare a schema: a cell may hold text, a number,
//! or nothing at all. [`Cell`] makes that discovery explicit so every branch
//! on cell type is exhaustively checked.

/// A single value in a [`RawGrid`](crate::RawGrid).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "type", content = "value")
)]
pub enum Cell {
    /// No value was extracted for this position.
    #[default]
    Absent,
    /// Text content.
    Text(String),
    /// A value the extractor recognised as a plain number.
    Number(f64),
}

impl Cell {
    /// Create a text cell.
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    /// Returns the text content if this is a [`Cell::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns `true` for [`Cell::Absent`].
    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }

    /// Text used when this cell labels a row.
    ///
    /// Absent labels render as the empty string.
    pub fn label_text(&self) -> String {
        match self {
            Cell::Absent => String::new(),
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => format_number(*value),
        }
    }

    /// Text used when this cell is promoted to a column header.
    ///
    /// Absent headers render as `nan`, which marks the column for removal
    /// when headers are finalized.
    pub fn header_text(&self) -> String {
        match self {
            Cell::Absent => "nan".to_string(),
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => format_number(*value),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Absent, Into::into)
    }
}

/// Render a number the way it reads in a report: integral values carry no
/// fractional part (`2019`, not `2019.0`).
pub fn format_number(value: f64) -> String {
    format!("{value}")
}
