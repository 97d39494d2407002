//! Rectangular cell grids as returned by a grid extractor.

use crate::cell::Cell;

/// A rectangular grid of [`Cell`]s, `n_rows × n_cols`.
///
/// Every row has exactly [`n_cols`](RawGrid::n_cols) cells; ragged input is
/// padded with [`Cell::Absent`] on construction.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawGrid {
    rows: Vec<Vec<Cell>>,
    n_cols: usize,
}

impl RawGrid {
    /// Build a grid from rows, padding short rows with [`Cell::Absent`].
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(n_cols, Cell::Absent);
                row
            })
            .collect();
        Self { rows, n_cols }
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// Returns `true` unless the grid has at least one row and one column.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.n_cols == 0
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Consume the grid and return its rows.
    pub fn into_rows(self) -> Vec<Vec<Cell>> {
        self.rows
    }

    /// The cell at `(row, col)`, if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    /// Iterate over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }

    /// Re-origin the grid at `(row, col)`.
    ///
    /// Equivalent to shifting every value up by `row` and left by `col`,
    /// discarding values that leave the grid, then truncating the trailing
    /// `row` rows and `col` columns. Offsets past the end yield an empty grid.
    pub fn reorigin(&self, row: usize, col: usize) -> Self {
        if row == 0 && col == 0 {
            return self.clone();
        }
        let n_cols = self.n_cols.saturating_sub(col);
        let rows = self
            .rows
            .iter()
            .skip(row)
            .map(|cells| cells.iter().skip(col).cloned().collect())
            .collect();
        Self { rows, n_cols }
    }

    /// Stack `other` below `self`.
    ///
    /// The narrower grid is padded with [`Cell::Absent`] columns on the right.
    pub fn vstack(&self, other: &RawGrid) -> Self {
        let rows = self.rows.iter().chain(other.rows.iter()).cloned().collect();
        Self::from_rows(rows)
    }
}

impl From<Vec<Vec<Cell>>> for RawGrid {
    fn from(rows: Vec<Vec<Cell>>) -> Self {
        Self::from_rows(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(n_rows: usize, n_cols: usize) -> RawGrid {
        let rows = (0..n_rows)
            .map(|r| (0..n_cols).map(|c| Cell::text(format!("{r}{c}"))).collect())
            .collect();
        RawGrid::from_rows(rows)
    }

    #[test]
    fn ragged_rows_are_padded() {
        let grid = RawGrid::from_rows(vec![
            vec![Cell::text("a")],
            vec![Cell::text("b"), Cell::text("c"), Cell::Number(1.0)],
        ]);
        assert_eq!(grid.n_cols(), 3);
        assert_eq!(grid.get(0, 2), Some(&Cell::Absent));
        assert!(grid.rows().iter().all(|row| row.len() == 3));
    }

    #[test]
    fn empty_grid() {
        assert!(RawGrid::default().is_empty());
        assert!(RawGrid::from_rows(vec![vec![]]).is_empty());
        assert!(!numbered(1, 1).is_empty());
    }

    #[test]
    fn reorigin_shifts_and_truncates() {
        let grid = numbered(5, 4);
        let shifted = grid.reorigin(2, 1);
        assert_eq!(shifted.n_rows(), 3);
        assert_eq!(shifted.n_cols(), 3);
        assert_eq!(shifted.get(0, 0), Some(&Cell::text("21")));
        assert_eq!(shifted.get(2, 2), Some(&Cell::text("43")));
    }

    #[test]
    fn reorigin_at_origin_is_identity() {
        let grid = numbered(3, 3);
        assert_eq!(grid.reorigin(0, 0), grid);
    }

    #[test]
    fn reorigin_past_end_is_empty() {
        let grid = numbered(2, 2);
        assert!(grid.reorigin(5, 0).is_empty());
        assert!(grid.reorigin(0, 5).is_empty());
    }

    #[test]
    fn vstack_pads_narrower_grid() {
        let top = numbered(2, 3);
        let bottom = numbered(1, 2);
        let stacked = top.vstack(&bottom);
        assert_eq!(stacked.n_rows(), 3);
        assert_eq!(stacked.n_cols(), 3);
        assert_eq!(stacked.get(2, 0), Some(&Cell::text("00")));
        assert_eq!(stacked.get(2, 2), Some(&Cell::Absent));
    }

    #[test]
    fn cells_are_row_major() {
        let grid = numbered(2, 2);
        let texts: Vec<_> = grid.cells().filter_map(Cell::as_text).collect();
        assert_eq!(texts, vec!["00", "01", "10", "11"]);
    }
}
