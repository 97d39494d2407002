//! End-to-end extraction: keyword → page → stitched grid → cleaned table.

mod common;

use common::{A, MockSource, build_pdf, t, text_content};
use salient::{
    AssembleOptions, Cell, LopdfGridSource, NormalizeSettings, RawGrid, SalientTableExtractor,
    StructuralViolation, TableError, TableNormalizer, normalize,
};

const HEADERS: [&str; 4] = [
    "For the year ended 31 March",
    "2019",
    "2018",
    "2019 vs 2018",
];

fn first_half() -> RawGrid {
    RawGrid::from_rows(vec![
        vec![A, t("Salient features"), A, A, A],
        vec![A, t("For the year ended 31 March"), t("2019"), t("2018"), t("% change")],
        vec![A, t("Income statement and selected returns"), A, A, A],
        vec![A, t("Net interest income"), t("R1 200m"), t("1 100"), t("9.1%")],
    ])
}

fn second_half() -> RawGrid {
    RawGrid::from_rows(vec![
        vec![A, t("Balance sheet"), A, A, A],
        vec![A, t("Total assets"), t("52 000"), Cell::Number(49000.0), t("6.1%")],
    ])
}

fn report_source() -> MockSource {
    MockSource::new(12)
        .strict_page(7, vec![RawGrid::from_rows(vec![vec![t("Salient features")]])])
        .lenient_page(7, vec![first_half()])
        .lenient_page(8, vec![second_half()])
}

#[test]
fn extract_two_page_table() {
    let source = report_source();
    let extractor = SalientTableExtractor::new(&source).unwrap();
    let found = extractor
        .extract(&(), "salient features", 5, 10, 2019)
        .unwrap();

    assert_eq!(found.page, 7);
    let table = &found.table;
    assert_eq!(table.headers(), &HEADERS);
    let labels: Vec<&str> = table.rows().iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "Income statement and selected returns",
            "Net interest income",
            "Balance sheet",
            "Total assets",
        ]
    );
    assert_eq!(table.value("Net interest income", "2019"), Some("1200"));
    assert_eq!(table.value("Total assets", "2018"), Some("49000"));
    assert_eq!(table.value("Total assets", "2019 vs 2018"), Some("6.1%"));
    assert_eq!(table.value("Balance sheet", "2019"), Some(""));
}

#[test]
fn extract_without_stitching_keeps_first_page() {
    let source = report_source();
    let extractor = SalientTableExtractor::new(&source)
        .unwrap()
        .with_assemble_options(AssembleOptions {
            stitch_continuation: false,
        });
    let found = extractor.extract(&(), "salient", 5, 10, 2019).unwrap();
    assert_eq!(found.table.n_rows(), 2);
    assert!(found.table.row("Total assets").is_none());
}

#[test]
fn extract_propagates_not_found() {
    let source = report_source();
    let extractor = SalientTableExtractor::new(&source).unwrap();
    assert!(matches!(
        extractor.extract(&(), "dividend", 5, 10, 2019),
        Err(TableError::NotFound { .. })
    ));
}

#[test]
fn extract_reports_missing_section_label() {
    let source = MockSource::new(3)
        .strict_page(1, vec![RawGrid::from_rows(vec![vec![t("Salient features")]])])
        .lenient_page(
            1,
            vec![RawGrid::from_rows(vec![
                vec![t("For the year ended 31 March"), t("2019")],
                vec![t("Revenue"), t("10")],
            ])],
        );
    let extractor = SalientTableExtractor::new(&source).unwrap();
    assert!(matches!(
        extractor.extract(&(), "salient", 1, 3, 2019),
        Err(TableError::StructuralAssumptionViolated(
            StructuralViolation::MissingSectionLabel { .. }
        ))
    ));
}

#[test]
fn custom_normalizer_is_used() {
    let source = report_source();
    let settings = NormalizeSettings {
        first_header: "Year to 31 March".to_string(),
        ..NormalizeSettings::default()
    };
    let extractor = SalientTableExtractor::new(&source)
        .unwrap()
        .with_normalizer(TableNormalizer::new(settings).unwrap());
    let found = extractor.extract(&(), "salient", 5, 10, 2020).unwrap();
    assert_eq!(
        found.table.headers(),
        &["Year to 31 March", "2019", "2018", "2020 vs 2019"]
    );
}

#[test]
fn normalize_is_idempotent_on_cleaned_tables() {
    let grid = first_half().vstack(&second_half());
    let once = normalize(&grid, 2019).unwrap();
    let twice = normalize(&once.to_raw_grid(), 2019).unwrap();
    assert_eq!(once, twice);
}

// --- from PDF bytes ---

fn annual_report_pdf() -> Vec<u8> {
    let mut pages: Vec<Vec<u8>> = (1..=6)
        .map(|n| {
            text_content(&[
                (72.0, 740.0, "Annual report 2019"),
                (72.0, 40.0, &format!("Page {n}")),
            ])
        })
        .collect();
    pages.push(text_content(&[
        (72.0, 760.0, "Salient features"),
        (72.0, 700.0, "For the year ended 31 March"),
        (300.0, 700.0, "2019"),
        (380.0, 700.0, "2018"),
        (460.0, 700.0, "% change"),
        (72.0, 686.0, "Income statement and selected returns"),
        (72.0, 672.0, "Net interest income"),
        (300.0, 672.0, "R1 200m"),
        (380.0, 672.0, "1 100"),
        (460.0, 672.0, "9.1%"),
        (72.0, 40.0, "Page 7"),
    ]));
    pages.push(text_content(&[
        (72.0, 760.0, "Net interest margin"),
        (300.0, 760.0, "3.1"),
        (380.0, 760.0, "2.9"),
        (460.0, 760.0, "6.9%"),
        (72.0, 746.0, "Balance sheet"),
        (72.0, 732.0, "Total assets"),
        (300.0, 732.0, "52 000"),
        (380.0, 732.0, "49 000"),
        (460.0, 732.0, "6.1%"),
        (72.0, 40.0, "Page 8"),
    ]));
    pages.push(text_content(&[(72.0, 740.0, "Directors' report")]));
    build_pdf(&pages)
}

#[test]
fn extract_from_pdf() {
    let source = LopdfGridSource::default();
    let doc = source.open(&annual_report_pdf()).unwrap();
    let extractor = SalientTableExtractor::new(&source).unwrap();
    let found = extractor
        .extract(&doc, "Salient features", 5, 10, 2019)
        .unwrap();

    assert_eq!(found.page, 7);
    let table = &found.table;
    assert_eq!(table.headers(), &HEADERS);
    let labels: Vec<&str> = table.rows().iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        [
            "Income statement and selected returns",
            "Net interest income",
            "Net interest margin",
            "Balance sheet",
            "Total assets",
        ]
    );
    assert_eq!(
        table.row("Net interest income").unwrap().values,
        ["1200", "1100", "9.1%"]
    );
    assert_eq!(
        table.row("Net interest margin").unwrap().values,
        ["3.1", "2.9", "6.9%"]
    );
    assert_eq!(
        table.row("Total assets").unwrap().values,
        ["52000", "49000", "6.1%"]
    );
}

#[test]
fn pdf_keyword_missing_from_range() {
    let source = LopdfGridSource::default();
    let doc = source.open(&annual_report_pdf()).unwrap();
    assert!(matches!(
        salient::find_page(&source, "Salient features", 1, 6, &doc),
        Err(TableError::NotFound { .. })
    ));
}
