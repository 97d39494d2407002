//! Grid construction from placed text runs.
//!
//! Runs are clustered into lines by baseline, joined into cells where they
//! nearly touch, and assigned to column bands derived from the cells of
//! multi-cell lines.

use salient_core::{Cell, RawGrid};

use crate::placement::TextRun;
use crate::source::ExtractionMode;

/// Tolerances for turning text runs into a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSettings {
    /// Maximum baseline difference for runs on the same line (in points).
    pub line_tolerance: f64,
    /// Maximum horizontal gap between runs joined into one cell (in points).
    pub word_gap: f64,
    /// Column bands closer than this are merged (in points).
    pub column_tolerance: f64,
    /// Minimum cells for a line to count as a table row in lenient mode.
    pub min_table_columns: usize,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            line_tolerance: 3.0,
            word_gap: 4.0,
            column_tolerance: 2.0,
            min_table_columns: 2,
        }
    }
}

/// A cell-sized piece of text on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Joined text.
    pub text: String,
    /// Left edge.
    pub x0: f64,
    /// Right edge.
    pub x1: f64,
}

/// Fragments sharing a baseline, sorted left-to-right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Baseline of the first run on the line.
    pub y: f64,
    /// Fragments on the line.
    pub fragments: Vec<Fragment>,
}

/// Cluster runs into lines, top of page first.
pub fn cluster_runs_into_lines(runs: &[TextRun], settings: &LayoutSettings) -> Vec<Line> {
    let mut sorted: Vec<&TextRun> = runs.iter().collect();
    sorted.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x0.total_cmp(&b.x0)));

    let mut grouped: Vec<(f64, Vec<&TextRun>)> = Vec::new();
    for run in sorted {
        match grouped.last_mut() {
            Some((y, members)) if (*y - run.y).abs() <= settings.line_tolerance => {
                members.push(run);
            }
            _ => grouped.push((run.y, vec![run])),
        }
    }

    grouped
        .into_iter()
        .map(|(y, mut members)| {
            members.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            Line {
                y,
                fragments: join_runs(&members, settings.word_gap),
            }
        })
        .collect()
}

fn join_runs(runs: &[&TextRun], word_gap: f64) -> Vec<Fragment> {
    let mut fragments: Vec<Fragment> = Vec::new();
    for run in runs {
        let text = run.text.trim();
        match fragments.last_mut() {
            Some(last) if run.x0 - last.x1 <= word_gap => {
                last.text.push(' ');
                last.text.push_str(text);
                last.x1 = last.x1.max(run.x1);
            }
            _ => fragments.push(Fragment {
                text: text.to_string(),
                x0: run.x0,
                x1: run.x1,
            }),
        }
    }
    fragments
}

/// Column bands `(x0, x1)`, left-to-right.
///
/// Bands come from lines with at least two fragments; a page with none
/// yields one band per distinct fragment extent.
pub fn column_bands(lines: &[Line], column_tolerance: f64) -> Vec<(f64, f64)> {
    let multi: Vec<&Line> = lines.iter().filter(|l| l.fragments.len() > 1).collect();
    let source: Vec<&Line> = if multi.is_empty() {
        lines.iter().collect()
    } else {
        multi
    };

    let mut spans: Vec<(f64, f64)> = source
        .iter()
        .flat_map(|line| line.fragments.iter().map(|f| (f.x0, f.x1)))
        .collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut bands: Vec<(f64, f64)> = Vec::new();
    for (x0, x1) in spans {
        match bands.last_mut() {
            Some(band) if x0 <= band.1 + column_tolerance => band.1 = band.1.max(x1),
            _ => bands.push((x0, x1)),
        }
    }
    bands
}

/// Index of the band a fragment starting at `x0` belongs to.
fn band_index(bands: &[(f64, f64)], x0: f64, column_tolerance: f64) -> usize {
    bands
        .iter()
        .rposition(|band| band.0 <= x0 + column_tolerance)
        .unwrap_or(0)
}

/// Type a cell: plain numbers become [`Cell::Number`].
pub fn classify(text: &str) -> Cell {
    let text = text.trim();
    if text.is_empty() {
        return Cell::Absent;
    }
    if is_plain_number(text) {
        if let Ok(value) = text.parse::<f64>() {
            return Cell::Number(value);
        }
    }
    Cell::text(text)
}

fn is_plain_number(text: &str) -> bool {
    let unsigned = text.strip_prefix(['-', '+']).unwrap_or(text);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    !int.is_empty()
        && int.bytes().all(|b| b.is_ascii_digit())
        && frac.is_none_or(|f| !f.is_empty() && f.bytes().all(|b| b.is_ascii_digit()))
}

/// Lay `lines` out on a common set of column bands.
pub fn lines_to_grid(lines: &[Line], settings: &LayoutSettings) -> RawGrid {
    let bands = column_bands(lines, settings.column_tolerance);
    let width = bands.len().max(1);

    let rows = lines
        .iter()
        .map(|line| {
            let mut texts: Vec<Option<String>> = vec![None; width];
            for fragment in &line.fragments {
                let col = band_index(&bands, fragment.x0, settings.column_tolerance);
                let slot = &mut texts[col];
                if let Some(existing) = slot.as_mut() {
                    existing.push(' ');
                    existing.push_str(&fragment.text);
                } else {
                    *slot = Some(fragment.text.clone());
                }
            }
            texts
                .into_iter()
                .map(|text| text.map_or(Cell::Absent, |t| classify(&t)))
                .collect()
        })
        .collect();

    RawGrid::from_rows(rows)
}

/// Build the grids of one page.
///
/// Strict mode keeps every line. Lenient mode keeps the lines from the first
/// to the last one with at least `min_table_columns` fragments, and returns
/// no grid when there is no such line.
pub fn build_grids(
    runs: &[TextRun],
    mode: ExtractionMode,
    settings: &LayoutSettings,
) -> Vec<RawGrid> {
    let lines = cluster_runs_into_lines(runs, settings);
    if lines.is_empty() {
        return Vec::new();
    }

    let span = match mode {
        ExtractionMode::Strict => &lines[..],
        ExtractionMode::Lenient => {
            let is_row = |line: &Line| line.fragments.len() >= settings.min_table_columns;
            match (
                lines.iter().position(is_row),
                lines.iter().rposition(is_row),
            ) {
                (Some(first), Some(last)) => &lines[first..=last],
                _ => return Vec::new(),
            }
        }
    };

    vec![lines_to_grid(span, settings)]
}
