//! Core library for receipt scanning.
//!
//! This crate provides:
//! - Smart extract: store name, date, phone and total from raw OCR text
//! - Locale configuration for the extraction rules
//! - An OCR boundary trait, with a native `pure-onnx-ocr` engine
//! - Summary tables and plain-text documents for export
//! - Append-only scan history

pub mod error;
pub mod models;
pub mod ocr;
pub mod receipt;
pub mod report;

pub use error::{ConfigError, OcrError, Result, ScanError};
pub use models::config::{ExtractionConfig, ScanConfig};
pub use models::history::{HistoryEntry, ScanHistory};
pub use models::receipt::{ExtractionResult, Field, FieldKind, RawText};
pub use ocr::{OcrOutput, TextBox, TextRecognizer};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use receipt::{extract, FieldExplanation, FieldExtractor, ReceiptExtractor};
pub use report::{FinalDocument, Language, Summary, SummaryRow};
