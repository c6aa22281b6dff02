//! Smart extract: receipt field extraction from OCR text.

mod extractor;
pub mod rules;

pub use extractor::{FieldExplanation, ReceiptExtractor};

use crate::models::receipt::{ExtractionResult, RawText};

/// Trait for receipt field extractors.
pub trait FieldExtractor {
    /// Extract the receipt fields from OCR lines.
    fn extract(&self, raw: &RawText) -> ExtractionResult;

    /// Extract the receipt fields from newline-joined text.
    fn extract_from_text(&self, text: &str) -> ExtractionResult {
        self.extract(&RawText::from_text(text))
    }
}

/// Extract with the default (Indonesian) rules.
pub fn extract(raw: &RawText) -> ExtractionResult {
    ReceiptExtractor::new().extract(raw)
}
