//! Shared test utilities: an in-memory grid source and a PDF builder.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use salient::{Cell, ExtractionMode, GridSource, RawGrid};

// ─── Mock grid source ──────────────────────────────────────────────────────

#[derive(Debug)]
pub struct MockError {
    pub page: usize,
}

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mock extractor failed on page {}", self.page)
    }
}

impl std::error::Error for MockError {}

/// Grid source serving canned grids and recording every request.
#[derive(Debug, Default)]
pub struct MockSource {
    pub page_count: usize,
    pub strict: BTreeMap<usize, Vec<RawGrid>>,
    pub lenient: BTreeMap<usize, Vec<RawGrid>>,
    pub failing: Vec<usize>,
    pub calls: RefCell<Vec<(usize, ExtractionMode)>>,
}

impl MockSource {
    pub fn new(page_count: usize) -> Self {
        Self {
            page_count,
            ..Self::default()
        }
    }

    pub fn strict_page(mut self, page: usize, grids: Vec<RawGrid>) -> Self {
        self.strict.insert(page, grids);
        self
    }

    pub fn lenient_page(mut self, page: usize, grids: Vec<RawGrid>) -> Self {
        self.lenient.insert(page, grids);
        self
    }

    pub fn failing_page(mut self, page: usize) -> Self {
        self.failing.push(page);
        self
    }

    /// Pages requested in `mode`, in order.
    pub fn visited(&self, mode: ExtractionMode) -> Vec<usize> {
        self.calls
            .borrow()
            .iter()
            .filter(|(_, m)| *m == mode)
            .map(|(page, _)| *page)
            .collect()
    }
}

impl GridSource for MockSource {
    type Document = ();
    type Error = MockError;

    fn page_count(&self, _doc: &()) -> usize {
        self.page_count
    }

    fn extract(
        &self,
        _doc: &(),
        page: usize,
        mode: ExtractionMode,
    ) -> Result<Vec<RawGrid>, MockError> {
        self.calls.borrow_mut().push((page, mode));
        if self.failing.contains(&page) {
            return Err(MockError { page });
        }
        let pages = match mode {
            ExtractionMode::Strict => &self.strict,
            ExtractionMode::Lenient => &self.lenient,
        };
        Ok(pages.get(&page).cloned().unwrap_or_default())
    }
}

pub fn t(text: &str) -> Cell {
    Cell::text(text)
}

pub const A: Cell = Cell::Absent;

/// Grid built from rows of optional strings (`None` is absent).
pub fn grid(rows: &[&[Option<&str>]]) -> RawGrid {
    RawGrid::from_rows(
        rows.iter()
            .map(|row| row.iter().map(|cell| Cell::from(*cell)).collect())
            .collect(),
    )
}

// ─── PDF fixtures ──────────────────────────────────────────────────────────

/// Escape a string for a PDF literal string.
pub fn pdf_escape(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}

/// Content stream placing each `(x, y, text)` with a 10pt font.
pub fn text_content(items: &[(f64, f64, &str)]) -> Vec<u8> {
    let mut ops = String::from("BT\n/F1 10 Tf\n");
    for (x, y, text) in items {
        ops.push_str(&format!("1 0 0 1 {x} {y} Tm ({}) Tj\n", pdf_escape(text)));
    }
    ops.push_str("ET\n");
    ops.into_bytes()
}

/// Build a PDF with one page per content stream.
pub fn build_pdf(contents: &[Vec<u8>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id: ObjectId = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids: Vec<Object> = Vec::new();
    for content in contents {
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.clone()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => contents.len() as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("failed to save test PDF");
    buf
}
