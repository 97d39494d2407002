//! The canonical, normalized table.

use crate::cell::Cell;
use crate::grid::RawGrid;

/// One labelled row of a [`CleanedTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableRow {
    /// Row label (column 0).
    pub label: String,
    /// Values for every header after the first, in header order.
    pub values: Vec<String>,
}

/// A normalized table: ordered headers and labelled rows.
///
/// The first header names the label column; `values` of every row line up
/// with `headers[1..]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CleanedTable {
    headers: Vec<String>,
    rows: Vec<TableRow>,
}

impl CleanedTable {
    /// Assemble a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<TableRow>) -> Self {
        Self { headers, rows }
    }

    /// Column headers, label column first.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Rows, top to bottom.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, label column included.
    pub fn n_cols(&self) -> usize {
        self.headers.len()
    }

    /// First row with the given label.
    pub fn row(&self, label: &str) -> Option<&TableRow> {
        self.rows.iter().find(|row| row.label == label)
    }

    /// All values under `header`, top to bottom.
    ///
    /// Returns `None` for unknown headers and for the label column.
    pub fn column(&self, header: &str) -> Option<Vec<&str>> {
        let index = self.value_index(header)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.values.get(index).map_or("", String::as_str))
                .collect(),
        )
    }

    /// The value at (`label`, `header`).
    pub fn value(&self, label: &str, header: &str) -> Option<&str> {
        let index = self.value_index(header)?;
        self.row(label)?.values.get(index).map(String::as_str)
    }

    /// Convert back into a grid: headers as the first row, then one text
    /// cell per label and value. Empty values stay empty text, so no row
    /// reads as wrapped when the grid is normalized again.
    pub fn to_raw_grid(&self) -> RawGrid {
        let header_row = self.headers.iter().map(|h| Cell::text(h.as_str())).collect();
        let body = self.rows.iter().map(|row| {
            std::iter::once(&row.label)
                .chain(&row.values)
                .map(|text| Cell::text(text.as_str()))
                .collect()
        });
        RawGrid::from_rows(std::iter::once(header_row).chain(body).collect())
    }

    fn value_index(&self, header: &str) -> Option<usize> {
        self.headers
            .iter()
            .skip(1)
            .position(|h| h == header)
    }
}
