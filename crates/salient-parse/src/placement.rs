//! Text placement from content stream operators.
//!
//! Tracks the parts of the PDF graphics and text state that decide where a
//! string lands on the page (CTM via `cm`/`q`/`Q`, text and line matrices
//! via `BT`, `Tm`, `Td`, `TD`, `T*`, leading via `TL`, font size via `Tf`)
//! and emits one [`TextRun`] per text-showing operator.
//!
//! Glyph widths are not resolved from font programs: every glyph advances
//! by [`GLYPH_WIDTH_EM`] of the font size. That is precise enough to tell
//! words apart from table columns.

use crate::tokenizer::{Operand, Operator};

/// Assumed advance of one glyph, as a fraction of the font size.
pub const GLYPH_WIDTH_EM: f64 = 0.5;

/// A string placed on the page, in PDF user space (origin bottom-left).
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Decoded text.
    pub text: String,
    /// Left edge.
    pub x0: f64,
    /// Right edge (estimated).
    pub x1: f64,
    /// Baseline.
    pub y: f64,
    /// Effective font size.
    pub size: f64,
}

/// Affine matrix `[a b c d e f]` in PDF row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f64; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    fn translation(tx: f64, ty: f64) -> Self {
        Matrix([1.0, 0.0, 0.0, 1.0, tx, ty])
    }

    /// `self × other`.
    fn concat(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    fn from_operands(values: &[f64]) -> Option<Matrix> {
        match values {
            [a, b, c, d, e, f] => Some(Matrix([*a, *b, *c, *d, *e, *f])),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct State {
    ctm: Matrix,
    saved: Vec<Matrix>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    leading: f64,
    font_size: f64,
}

impl State {
    fn new() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            saved: Vec::new(),
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            leading: 0.0,
            font_size: 1.0,
        }
    }

    fn move_line(&mut self, tx: f64, ty: f64) {
        self.line_matrix = Matrix::translation(tx, ty).concat(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn next_line(&mut self) {
        let leading = self.leading;
        self.move_line(0.0, -leading);
    }

    /// Place `bytes` at the current text position and advance past them.
    fn show(&mut self, bytes: &[u8], runs: &mut Vec<TextRun>) {
        let text = decode_latin1(bytes);
        let advance = text.chars().count() as f64 * GLYPH_WIDTH_EM * self.font_size;
        let start = self.text_matrix.concat(&self.ctm);
        self.text_matrix = Matrix::translation(advance, 0.0).concat(&self.text_matrix);
        let end = self.text_matrix.concat(&self.ctm);

        if text.trim().is_empty() {
            return;
        }
        let [a, b, ..] = start.0;
        let scale = (a * a + b * b).sqrt();
        runs.push(TextRun {
            text,
            x0: start.0[4].min(end.0[4]),
            x1: start.0[4].max(end.0[4]),
            y: start.0[5],
            size: self.font_size * scale,
        });
    }

    /// `TJ`: strings interleaved with kerning adjustments in 1/1000 em.
    fn show_array(&mut self, items: &[Operand], runs: &mut Vec<TextRun>) {
        for item in items {
            match item {
                Operand::Str(bytes) => self.show(bytes, runs),
                Operand::Number(adjust) => {
                    let tx = -adjust / 1000.0 * self.font_size;
                    self.text_matrix = Matrix::translation(tx, 0.0).concat(&self.text_matrix);
                }
                _ => {}
            }
        }
    }
}

/// Decode string bytes of a simple font as Latin-1.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Interpret operators and collect every text run, in stream order.
pub fn place_text(ops: &[Operator]) -> Vec<TextRun> {
    let mut state = State::new();
    let mut runs = Vec::new();

    for op in ops {
        let numbers = op.numbers();
        let numbers = numbers.as_deref();
        match (op.name.as_str(), numbers) {
            ("q", _) => state.saved.push(state.ctm),
            ("Q", _) => {
                if let Some(ctm) = state.saved.pop() {
                    state.ctm = ctm;
                }
            }
            ("cm", Some(values)) => {
                if let Some(m) = Matrix::from_operands(values) {
                    state.ctm = m.concat(&state.ctm);
                }
            }
            ("BT", _) => {
                state.text_matrix = Matrix::IDENTITY;
                state.line_matrix = Matrix::IDENTITY;
            }
            ("Tf", _) => {
                if let Some(size) = op.operands.last().and_then(Operand::as_number) {
                    state.font_size = size;
                }
            }
            ("TL", Some([leading])) => state.leading = *leading,
            ("Tm", Some(values)) => {
                if let Some(m) = Matrix::from_operands(values) {
                    state.text_matrix = m;
                    state.line_matrix = m;
                }
            }
            ("Td", Some([tx, ty])) => state.move_line(*tx, *ty),
            ("TD", Some([tx, ty])) => {
                state.leading = -ty;
                state.move_line(*tx, *ty);
            }
            ("T*", _) => state.next_line(),
            ("Tj", _) => {
                if let Some(Operand::Str(bytes)) = op.operands.first() {
                    state.show(bytes, &mut runs);
                }
            }
            ("TJ", _) => {
                if let Some(Operand::Array(items)) = op.operands.first() {
                    state.show_array(items, &mut runs);
                }
            }
            ("'", _) => {
                state.next_line();
                if let Some(Operand::Str(bytes)) = op.operands.last() {
                    state.show(bytes, &mut runs);
                }
            }
            ("\"", _) => {
                state.next_line();
                if let Some(Operand::Str(bytes)) = op.operands.last() {
                    state.show(bytes, &mut runs);
                }
            }
            _ => {}
        }
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn runs(content: &[u8]) -> Vec<TextRun> {
        place_text(&tokenize(content).unwrap())
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn td_positions_runs() {
        let placed = runs(b"BT /F1 10 Tf 72 700 Td (Balance sheet) Tj 0 -14 Td (Total) Tj ET");
        assert_eq!(placed.len(), 2);
        assert_eq!(placed[0].text, "Balance sheet");
        assert_approx(placed[0].x0, 72.0);
        assert_approx(placed[0].y, 700.0);
        assert_approx(placed[0].x1, 72.0 + 13.0 * 5.0);
        assert_approx(placed[1].x0, 72.0);
        assert_approx(placed[1].y, 686.0);
    }

    #[test]
    fn tm_replaces_matrix() {
        let placed = runs(b"BT /F1 12 Tf 1 0 0 1 300 500 Tm (2019) Tj ET");
        assert_approx(placed[0].x0, 300.0);
        assert_approx(placed[0].y, 500.0);
        assert_approx(placed[0].size, 12.0);
    }

    #[test]
    fn cm_translates_and_q_restores() {
        let placed = runs(
            b"q 1 0 0 1 10 20 cm BT /F1 10 Tf 0 0 Td (a) Tj ET Q BT /F1 10 Tf (b) Tj ET",
        );
        assert_approx(placed[0].x0, 10.0);
        assert_approx(placed[0].y, 20.0);
        assert_approx(placed[1].x0, 0.0);
        assert_approx(placed[1].y, 0.0);
    }

    #[test]
    fn consecutive_tj_advances() {
        let placed = runs(b"BT /F1 10 Tf 100 100 Td (ab) Tj (cd) Tj ET");
        assert_approx(placed[1].x0, 110.0);
    }

    #[test]
    fn tj_array_applies_kerning() {
        let placed = runs(b"BT /F1 10 Tf 0 0 Td [(ab) -1000 (cd)] TJ ET");
        assert_eq!(placed.len(), 2);
        assert_approx(placed[1].x0, 20.0);
    }

    #[test]
    fn t_star_and_quote_use_leading() {
        let placed = runs(b"BT /F1 10 Tf 12 TL 50 400 Td (a) Tj T* (b) Tj (c) ' ET");
        assert_approx(placed[1].y, 388.0);
        assert_approx(placed[2].y, 376.0);
        assert_approx(placed[2].x0, 50.0);
    }

    #[test]
    fn td_upper_sets_leading() {
        let placed = runs(b"BT /F1 10 Tf 0 500 Td 0 -15 TD (a) Tj T* (b) Tj ET");
        assert_approx(placed[0].y, 485.0);
        assert_approx(placed[1].y, 470.0);
    }

    #[test]
    fn whitespace_runs_dropped() {
        assert!(runs(b"BT /F1 10 Tf (   ) Tj ET").is_empty());
    }

    #[test]
    fn latin1_decoding() {
        assert_eq!(decode_latin1(b"R\xe9sum\xe9"), "R\u{e9}sum\u{e9}");
    }
}
