//! Summary tables and final documents built from an extraction result.
//!
//! This is the only place where a missing field becomes a placeholder string.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::receipt::{ExtractionResult, FieldKind, RawText};

/// Label language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "id")]
    Indonesian,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::Indonesian => "id",
            Language::English => "en",
        }
    }

    /// Display label of a field.
    pub fn label(&self, kind: FieldKind) -> &'static str {
        match (self, kind) {
            (Language::Indonesian, FieldKind::StoreName) => "Nama Toko",
            (Language::Indonesian, FieldKind::Date) => "Tanggal",
            (Language::Indonesian, FieldKind::Phone) => "Telepon",
            (Language::Indonesian, FieldKind::Total) => "Total Harga",
            (Language::English, FieldKind::StoreName) => "Store Name",
            (Language::English, FieldKind::Date) => "Date",
            (Language::English, FieldKind::Phone) => "Phone",
            (Language::English, FieldKind::Total) => "Total Price",
        }
    }

    /// Shown in place of a field that was not found.
    pub fn placeholder(&self) -> &'static str {
        match self {
            Language::Indonesian => "Tidak ditemukan",
            Language::English => "Not found",
        }
    }

    /// Column headers of the summary table.
    pub fn table_header(&self) -> [&'static str; 2] {
        match self {
            Language::Indonesian => ["Kolom", "Nilai"],
            Language::English => ["Field", "Value"],
        }
    }

    fn document_title(&self) -> &'static str {
        match self {
            Language::Indonesian => "HASIL SCAN STRUK",
            Language::English => "RECEIPT SCAN RESULT",
        }
    }

    fn source_label(&self) -> &'static str {
        match self {
            Language::Indonesian => "Sumber",
            Language::English => "Source",
        }
    }

    fn scanned_at_label(&self) -> &'static str {
        match self {
            Language::Indonesian => "Waktu scan",
            Language::English => "Scanned at",
        }
    }

    fn raw_text_heading(&self) -> &'static str {
        match self {
            Language::Indonesian => "Teks hasil OCR",
            Language::English => "OCR text",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" | "indonesian" | "indonesia" => Ok(Language::Indonesian),
            "en" | "english" => Ok(Language::English),
            other => Err(format!("unknown language: {}", other)),
        }
    }
}

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub kind: FieldKind,
    pub label: String,
    pub value: String,
    pub found: bool,
}

/// Field-per-row view of an extraction result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub language: Language,
    pub rows: Vec<SummaryRow>,
}

impl Summary {
    pub fn new(result: &ExtractionResult, language: Language) -> Self {
        let rows = result
            .fields()
            .map(|(kind, field)| SummaryRow {
                kind,
                label: language.label(kind).to_string(),
                value: field.display_or(language.placeholder()).to_string(),
                found: field.is_found(),
            })
            .collect();

        Self { language, rows }
    }

    /// Rows as `(label, value)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rows.iter().map(|r| (r.label.as_str(), r.value.as_str()))
    }

    /// Aligned `label : value` lines.
    pub fn render(&self) -> String {
        let width = self.rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);
        let mut output = String::new();
        for (label, value) in self.pairs() {
            output.push_str(&format!("{:<width$} : {}\n", label, value, width = width));
        }
        output
    }
}

/// Plain-text document combining the summary with the OCR text.
#[derive(Debug, Clone)]
pub struct FinalDocument<'a> {
    result: &'a ExtractionResult,
    raw_text: &'a RawText,
    language: Language,
    source: Option<String>,
    scanned_at: Option<DateTime<Utc>>,
}

impl<'a> FinalDocument<'a> {
    pub fn new(result: &'a ExtractionResult, raw_text: &'a RawText, language: Language) -> Self {
        Self {
            result,
            raw_text,
            language,
            source: None,
            scanned_at: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_timestamp(mut self, scanned_at: DateTime<Utc>) -> Self {
        self.scanned_at = Some(scanned_at);
        self
    }

    pub fn render(&self) -> String {
        let lang = self.language;
        let mut output = String::new();

        output.push_str(&format!("=== {} ===\n", lang.document_title()));
        if let Some(source) = &self.source {
            output.push_str(&format!("{}: {}\n", lang.source_label(), source));
        }
        if let Some(at) = &self.scanned_at {
            output.push_str(&format!(
                "{}: {}\n",
                lang.scanned_at_label(),
                at.format("%Y-%m-%d %H:%M:%S UTC")
            ));
        }
        output.push('\n');

        output.push_str(&Summary::new(self.result, lang).render());
        output.push('\n');

        output.push_str(&format!("--- {} ---\n", lang.raw_text_heading()));
        for line in self.raw_text.lines() {
            output.push_str(line);
            output.push('\n');
        }

        output
    }
}

impl fmt::Display for FinalDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
