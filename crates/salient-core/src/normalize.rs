//! Realignment and normalization of an extracted table grid.
//!
//! [`TableNormalizer::normalize`] runs seven steps, each a function from one
//! table state to the next:
//!
//! 1. [`find_anchor`] + [`RawGrid::reorigin`]: move the anchor cell to `(0, 0)`.
//! 2. [`promote_header`]: the first row becomes the header.
//! 3. [`merge_wrapped_rows`]: re-join labels split over two physical rows.
//! 4. [`sanitize_values`]: reduce value cells to the allowed character set.
//! 5. [`resync_header`]: drop leading noise rows above the section row.
//! 6. [`strip_labels`]: remove non-printable-ASCII from labels and headers.
//! 7. [`finalize`]: rewrite headers and drop `nan` columns.

use crate::cell::{Cell, format_number};
use crate::cleaned::{CleanedTable, TableRow};
use crate::error::{StructuralViolation, TableError};
use crate::grid::RawGrid;
use crate::sanitize::{ValueSanitizer, strip_non_printable};
use crate::settings::NormalizeSettings;

/// A grid whose header row has been split off.
///
/// Every row (and the header) has the same width; column 0 holds row labels.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HeaderedGrid {
    /// Column headers, label column first.
    pub headers: Vec<String>,
    /// Data rows, label cell first.
    pub rows: Vec<Vec<Cell>>,
}

impl HeaderedGrid {
    /// Label of data row `index`, or the empty string.
    pub fn label(&self, index: usize) -> String {
        self.rows
            .get(index)
            .and_then(|row| row.first())
            .map(Cell::label_text)
            .unwrap_or_default()
    }
}

/// Normalizes raw grids into [`CleanedTable`]s.
#[derive(Debug, Clone)]
pub struct TableNormalizer {
    settings: NormalizeSettings,
    sanitizer: ValueSanitizer,
}

impl TableNormalizer {
    /// Create a normalizer.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::InvalidSettings`] if the value charset does not
    /// compile.
    pub fn new(settings: NormalizeSettings) -> Result<Self, TableError> {
        let sanitizer = ValueSanitizer::new(&settings.value_charset)?;
        Ok(Self {
            settings,
            sanitizer,
        })
    }

    /// Create a normalizer with [`NormalizeSettings::default`].
    pub fn with_defaults() -> Result<Self, TableError> {
        Self::new(NormalizeSettings::default())
    }

    /// The settings in use.
    pub fn settings(&self) -> &NormalizeSettings {
        &self.settings
    }

    /// The value sanitizer in use.
    pub fn sanitizer(&self) -> &ValueSanitizer {
        &self.sanitizer
    }

    /// Normalize `grid` for the reporting `year`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::StructuralAssumptionViolated`] if the anchor
    /// phrase or the section label cannot be found.
    pub fn normalize(&self, grid: &RawGrid, year: i32) -> Result<CleanedTable, TableError> {
        let settings = &self.settings;

        let (anchor_row, anchor_col) =
            find_anchor(grid, &settings.anchor_phrase).ok_or_else(|| {
                StructuralViolation::MissingAnchor {
                    phrase: settings.anchor_phrase.clone(),
                }
            })?;
        #[cfg(feature = "tracing")]
        tracing::debug!(anchor_row, anchor_col, "re-origin table at anchor");
        let grid = grid.reorigin(anchor_row, anchor_col);

        let table = promote_header(grid);
        let table = merge_wrapped_rows(table, settings);
        let table = sanitize_values(table, &self.sanitizer, 1);
        let table = resync_header(table, settings)?;
        let table = sanitize_values(table, &self.sanitizer, 0);
        let table = strip_labels(table);

        Ok(finalize(table, year, settings, &self.sanitizer))
    }
}

/// Locate the anchor cell: the first cell of a row whose text contains
/// `phrase`.
///
/// Every row is examined; when several rows contain the phrase, the last
/// one wins.
pub fn find_anchor(grid: &RawGrid, phrase: &str) -> Option<(usize, usize)> {
    let mut anchor = None;
    for (r, row) in grid.rows().iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            if cell.as_text().is_some_and(|text| text.contains(phrase)) {
                anchor = Some((r, c));
                break;
            }
        }
    }
    anchor
}

/// Split the first row off as the header.
pub fn promote_header(grid: RawGrid) -> HeaderedGrid {
    let mut rows = grid.into_rows().into_iter();
    let headers = rows
        .next()
        .map(|row| row.iter().map(Cell::header_text).collect())
        .unwrap_or_default();
    HeaderedGrid {
        headers,
        rows: rows.collect(),
    }
}

/// Merge labels that extraction wrapped onto two physical rows.
///
/// A row whose value cells are all absent is folded into the row below it
/// (`"{label} {next label}"`), unless either label is protected. Merges
/// cascade: a folded label can be folded again into the following row.
pub fn merge_wrapped_rows(table: HeaderedGrid, settings: &NormalizeSettings) -> HeaderedGrid {
    let HeaderedGrid { headers, mut rows } = table;
    let mut folded = vec![false; rows.len()];

    for r in 0..rows.len().saturating_sub(1) {
        let values_absent = rows[r].iter().skip(1).all(Cell::is_absent);
        if !values_absent {
            continue;
        }
        let label = rows[r].first().map(Cell::label_text).unwrap_or_default();
        let next = rows[r + 1]
            .first()
            .map(Cell::label_text)
            .unwrap_or_default();
        if settings.is_protected(&label) || settings.is_protected(&next) {
            continue;
        }

        let joined = join_labels(&label, &next);
        if let Some(target) = rows[r + 1].first_mut() {
            *target = Cell::Text(joined);
            folded[r] = true;
        }
    }

    let rows = rows
        .into_iter()
        .zip(folded)
        .filter_map(|(row, gone)| (!gone).then_some(row))
        .collect();
    HeaderedGrid { headers, rows }
}

fn join_labels(first: &str, second: &str) -> String {
    match (first.is_empty(), second.is_empty()) {
        (true, _) => second.to_string(),
        (_, true) => first.to_string(),
        _ => format!("{first} {second}"),
    }
}

/// Sanitize text value cells of every data row from `first_row` on.
///
/// Labels (column 0) and non-text cells are left untouched.
pub fn sanitize_values(
    table: HeaderedGrid,
    sanitizer: &ValueSanitizer,
    first_row: usize,
) -> HeaderedGrid {
    let HeaderedGrid { headers, rows } = table;
    let rows = rows
        .into_iter()
        .enumerate()
        .map(|(r, row)| {
            if r < first_row {
                return row;
            }
            row.into_iter()
                .enumerate()
                .map(|(c, cell)| match cell {
                    Cell::Text(text) if c > 0 => Cell::Text(sanitizer.clean(&text)),
                    other => other,
                })
                .collect()
        })
        .collect();
    HeaderedGrid { headers, rows }
}

/// Promote leading rows to the header until the section row comes first.
///
/// The last promoted row provides the headers. At most
/// [`max_resync_rows`](NormalizeSettings::max_resync_rows) rows are promoted
/// (all data rows by default).
///
/// # Errors
///
/// Returns [`StructuralViolation::MissingSectionLabel`] when the section row
/// is not found within the bound.
pub fn resync_header(
    table: HeaderedGrid,
    settings: &NormalizeSettings,
) -> Result<HeaderedGrid, TableError> {
    let HeaderedGrid { mut headers, mut rows } = table;
    let limit = settings
        .max_resync_rows
        .map_or(rows.len(), |max| max.min(rows.len()));

    let position = rows.iter().take(limit + 1).position(|row| {
        row.first()
            .is_some_and(|cell| cell.label_text().trim() == settings.section_label)
    });
    let Some(skip) = position else {
        return Err(StructuralViolation::MissingSectionLabel {
            label: settings.section_label.clone(),
            examined: limit.min(rows.len()),
        }
        .into());
    };

    if skip > 0 {
        #[cfg(feature = "tracing")]
        tracing::debug!(skipped = skip, "promoted leading rows to header");
        headers = rows[skip - 1].iter().map(Cell::header_text).collect();
        rows.drain(..skip);
    }
    Ok(HeaderedGrid { headers, rows })
}

/// Remove characters outside printable ASCII from text labels and headers.
///
/// Best effort: labels that are not text are kept as they are.
pub fn strip_labels(table: HeaderedGrid) -> HeaderedGrid {
    let HeaderedGrid { headers, rows } = table;
    let headers = headers.iter().map(|h| strip_non_printable(h)).collect();
    let rows = rows
        .into_iter()
        .map(|mut row| {
            if let Some(Cell::Text(label)) = row.first_mut() {
                let stripped = strip_non_printable(label);
                #[cfg(feature = "tracing")]
                if stripped.len() != label.len() {
                    tracing::debug!(label = %label, "stripped non-ASCII from row label");
                }
                *label = stripped;
            }
            row
        })
        .collect();
    HeaderedGrid { headers, rows }
}

/// Rewrite headers, drop `nan` columns and render the final table.
pub fn finalize(
    table: HeaderedGrid,
    year: i32,
    settings: &NormalizeSettings,
    sanitizer: &ValueSanitizer,
) -> CleanedTable {
    let mut headers: Vec<String> = table
        .headers
        .iter()
        .map(|header| {
            let header = header.replace('*', "");
            if header.contains(&settings.change_marker) {
                format!("{year} vs {}", year - 1)
            } else {
                header
            }
        })
        .collect();
    if let Some(first) = headers.first_mut() {
        *first = settings.first_header.clone();
    }

    let kept: Vec<usize> = headers
        .iter()
        .enumerate()
        .filter(|(_, header)| !header.contains(&settings.dropped_header_marker))
        .map(|(index, _)| index)
        .collect();
    #[cfg(feature = "tracing")]
    if kept.len() != headers.len() {
        tracing::debug!(
            dropped = headers.len() - kept.len(),
            "dropped columns with malformed headers"
        );
    }

    let rows = table
        .rows
        .iter()
        .map(|row| TableRow {
            label: row.first().map(Cell::label_text).unwrap_or_default(),
            values: kept
                .iter()
                .filter(|&&index| index > 0)
                .map(|&index| render_value(row.get(index), sanitizer))
                .collect(),
        })
        .collect();
    let headers = kept.iter().map(|&index| headers[index].clone()).collect();

    CleanedTable::new(headers, rows)
}

fn render_value(cell: Option<&Cell>, sanitizer: &ValueSanitizer) -> String {
    match cell {
        Some(Cell::Text(text)) => text.clone(),
        Some(Cell::Number(value)) => sanitizer.clean(&format_number(*value)),
        Some(Cell::Absent) | None => String::new(),
    }
}
