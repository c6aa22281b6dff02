//! End-to-end extraction over realistic receipt text.
//!
//! A MockRecognizer stands in for the OCR engine so these tests run without
//! model files.

use image::DynamicImage;
use pretty_assertions::assert_eq;

use scantext_core::{
    extract, ExtractionResult, Field, FieldExtractor, FinalDocument, Language, OcrError,
    RawText, ReceiptExtractor, ScanHistory, HistoryEntry, Summary, TextRecognizer,
};

struct MockRecognizer {
    lines: Vec<&'static str>,
}

impl TextRecognizer for MockRecognizer {
    fn recognize(&self, _image: &DynamicImage) -> Result<RawText, OcrError> {
        Ok(RawText::from_lines(self.lines.iter().copied()))
    }
}

struct FailingRecognizer;

impl TextRecognizer for FailingRecognizer {
    fn recognize(&self, _image: &DynamicImage) -> Result<RawText, OcrError> {
        Err(OcrError::Recognition("model not loaded".to_string()))
    }
}

fn lines(text: &[&str]) -> RawText {
    RawText::from_lines(text.iter().copied())
}

// ---------------------------------------------------------------------------
// Store name
// ---------------------------------------------------------------------------
#[test]
fn earliest_uppercase_line_is_store_name() {
    let raw = lines(&["struk belanja", "  TOKO SEJAHTERA  ", "JL. MAWAR 3", "Kasir: Ani"]);
    assert_eq!(extract(&raw).store_name, Field::found("TOKO SEJAHTERA"));
}

#[test]
fn short_or_mixed_case_lines_are_not_store_names() {
    let raw = lines(&["ABC", "Toko Sejahtera", "12345", "=====", "Rp 5.000"]);
    assert_eq!(extract(&raw).store_name, Field::NotFound);
}

// ---------------------------------------------------------------------------
// Phone
// ---------------------------------------------------------------------------
#[test]
fn phone_found_verbatim() {
    let raw = lines(&["TOKO", "Telp 08123456789"]);
    assert_eq!(extract(&raw).phone, Field::found("08123456789"));
}

#[test]
fn phone_split_by_ocr_spacing() {
    let raw = lines(&["CS: +62 21 5550 1234", "Terima kasih"]);
    assert_eq!(extract(&raw).phone, Field::found("+622155501234"));
}

// ---------------------------------------------------------------------------
// Date
// ---------------------------------------------------------------------------
#[test]
fn numeric_date_has_priority_over_long_form() {
    let long_first = lines(&["15 Januari 2026", "01/02/2026"]);
    let numeric_first = lines(&["01/02/2026", "15 Januari 2026"]);

    assert_eq!(extract(&long_first).date, Field::found("01/02/2026"));
    assert_eq!(extract(&numeric_first).date, Field::found("01/02/2026"));
}

#[test]
fn long_form_date_when_no_numeric_date() {
    let raw = lines(&["TOKO", "Senin, 15 januari 2026 09:12"]);
    assert_eq!(extract(&raw).date, Field::found("15 januari 2026"));
}

// ---------------------------------------------------------------------------
// Total
// ---------------------------------------------------------------------------
#[test]
fn last_rupiah_figure_is_total() {
    let raw = lines(&["Total: Rp 10.000", "Tunai Rp 50.000", "Grand Total Rp 23.500"]);
    assert_eq!(extract(&raw).total, Field::found("Rp 23.500"));
}

#[test]
fn largest_number_is_total_without_rupiah_prefix() {
    let raw = lines(&["Air mineral 5000", "Nasi goreng 12000", "Meja 4"]);
    assert_eq!(extract(&raw).total, Field::found("Rp 12.000"));
}

#[test]
fn reference_numbers_can_win_the_fallback() {
    // Known weakness of the largest-number heuristic, kept as is
    let raw = lines(&["No. Ref 8800123456", "Total 23.500"]);
    assert_eq!(extract(&raw).total, Field::found("Rp 8.800.123.456"));
}

// ---------------------------------------------------------------------------
// Whole record
// ---------------------------------------------------------------------------
#[test]
fn empty_input_resolves_everything_to_not_found() {
    assert_eq!(extract(&RawText::default()), ExtractionResult::default());
    assert_eq!(extract(&RawText::from_text("")), ExtractionResult::default());
}

#[test]
fn full_receipt_through_mock_ocr() {
    let recognizer = MockRecognizer {
        lines: vec![
            "ALFAMART",
            "PT Sumber Alfaria Trijaya",
            "Jl. Raya Bogor Km 30",
            "Telp: 0812 9876 5432",
            "Tgl. 03-11-2025  Jam 19:41",
            "AQUA 600ML     2 x 3.500    7.000",
            "ROTI SOBEK     1 x 12.500  12.500",
            "Total Item 3",
            "HARGA JUAL :   Rp 19.500",
            "TUNAI      :   Rp 20.000",
            "KEMBALI    :   Rp 500",
        ],
    };

    let raw = recognizer.recognize(&DynamicImage::new_rgb8(1, 1)).unwrap();
    let extractor = ReceiptExtractor::new();
    let result = extractor.extract(&raw);

    assert_eq!(
        result,
        ExtractionResult {
            store_name: Field::found("ALFAMART"),
            date: Field::found("03-11-2025"),
            phone: Field::found("081298765432"),
            total: Field::found("Rp 500"),
        }
    );

    assert_eq!(
        extractor.parse_date(&result.date),
        chrono::NaiveDate::from_ymd_opt(2025, 11, 3)
    );
}

#[test]
fn ocr_failure_is_an_error_not_an_empty_result() {
    let err = FailingRecognizer
        .recognize(&DynamicImage::new_rgb8(1, 1))
        .unwrap_err();
    assert!(err.to_string().contains("model not loaded"));
}

#[test]
fn line_sequence_and_joined_text_extract_the_same() {
    let raw = lines(&["toko\nINDOMARET", "Telp 0812 3456 7890\nKasir: Budi", "Rp 12.000"]);
    let joined = RawText::from_text(&raw.joined());

    assert_eq!(raw, joined);
    assert_eq!(extract(&raw), extract(&joined));
    assert_eq!(extract(&raw).store_name, Field::found("INDOMARET"));
}

#[test]
fn extraction_is_repeatable() {
    let extractor = ReceiptExtractor::new();
    let text = "TOKO ABADI\nTelp 081234567890\n1/2/26\nRp 99.000";
    let first = extractor.extract_from_text(text);
    let second = extractor.extract_from_text(text);
    assert_eq!(first, second);
}

#[test]
fn summary_and_document_render_placeholders() {
    let raw = lines(&["TOKO ABADI", "Bayar Rp 5.000"]);
    let result = extract(&raw);

    let summary = Summary::new(&result, Language::Indonesian);
    let values: Vec<&str> = summary.pairs().map(|(_, v)| v).collect();
    assert_eq!(values, vec!["TOKO ABADI", "Tidak ditemukan", "Tidak ditemukan", "Rp 5.000"]);

    let doc = FinalDocument::new(&result, &raw, Language::Indonesian).render();
    assert!(doc.contains("Telepon     : Tidak ditemukan"));
    assert!(doc.contains("Bayar Rp 5.000"));
}

#[test]
fn history_keeps_snapshots_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");

    for (source, text) in [("a.txt", "TOKO SATU\nRp 1.000"), ("b.txt", "TOKO DUA\nRp 2.000")] {
        let raw = RawText::from_text(text);
        let result = extract(&raw);
        HistoryEntry::new(source, raw, result).append_to_file(&path).unwrap();
    }

    let history = ScanHistory::from_file(&path).unwrap();
    let totals: Vec<Option<&str>> = history.entries().iter().map(|e| e.result.total.value()).collect();
    assert_eq!(totals, vec![Some("Rp 1.000"), Some("Rp 2.000")]);
}
