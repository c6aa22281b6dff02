//! Receipt data models: OCR text in, structured fields out.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordered lines of recognized text, as produced by OCR.
///
/// Line order is the reading order on the page. Joining with `\n`
/// reproduces the text the line-based rules see.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawText {
    lines: Vec<String>,
}

impl RawText {
    /// Build from already separated lines.
    ///
    /// An element holding line breaks is split, so `lines()` always equals
    /// the lines of `joined()`.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut out = Vec::new();
        for line in lines {
            let line: String = line.into();
            if line.contains('\n') {
                out.extend(line.lines().map(str::to_string));
            } else {
                out.push(line);
            }
        }
        Self { lines: out }
    }

    /// Build from a newline-joined blob.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.lines())
    }

    /// The individual lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined with `\n`.
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }

    /// True when there are no lines or every line is blank.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&str> for RawText {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<Vec<String>> for RawText {
    fn from(lines: Vec<String>) -> Self {
        Self::from_lines(lines)
    }
}

impl<S: Into<String>> FromIterator<S> for RawText {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_lines(iter)
    }
}

/// A single extracted value, or the explicit absence of one.
///
/// `NotFound` is never represented as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Field {
    /// The rule located a value.
    Found(String),
    /// No match for this field.
    #[default]
    NotFound,
}

impl Field {
    pub fn found(value: impl Into<String>) -> Self {
        Field::Found(value.into())
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Field::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Field::NotFound)
    }

    /// Borrow the value, if any.
    pub fn value(&self) -> Option<&str> {
        match self {
            Field::Found(v) => Some(v.as_str()),
            Field::NotFound => None,
        }
    }

    /// The value, or `placeholder` for a missing field.
    pub fn display_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.value().unwrap_or(placeholder)
    }

    pub fn into_option(self) -> Option<String> {
        match self {
            Field::Found(v) => Some(v),
            Field::NotFound => None,
        }
    }
}

impl From<Option<String>> for Field {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(v) => Field::Found(v),
            None => Field::NotFound,
        }
    }
}

/// The four receipt fields, in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    StoreName,
    Date,
    Phone,
    Total,
}

impl FieldKind {
    pub const ALL: [FieldKind; 4] = [
        FieldKind::StoreName,
        FieldKind::Date,
        FieldKind::Phone,
        FieldKind::Total,
    ];

    /// Stable machine-readable key.
    pub fn key(&self) -> &'static str {
        match self {
            FieldKind::StoreName => "store_name",
            FieldKind::Date => "date",
            FieldKind::Phone => "phone",
            FieldKind::Total => "total",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Structured fields inferred from one receipt's OCR text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Store name (first all-caps heading line).
    pub store_name: Field,

    /// Transaction date, verbatim as printed.
    pub date: Field,

    /// Phone number, whitespace removed.
    pub phone: Field,

    /// Total amount as a currency string (e.g. `Rp 23.500`).
    pub total: Field,
}

impl ExtractionResult {
    /// Look up a field by kind.
    pub fn get(&self, kind: FieldKind) -> &Field {
        match kind {
            FieldKind::StoreName => &self.store_name,
            FieldKind::Date => &self.date,
            FieldKind::Phone => &self.phone,
            FieldKind::Total => &self.total,
        }
    }

    /// Fields in canonical order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldKind, &Field)> {
        FieldKind::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    /// Number of fields that were located.
    pub fn found_count(&self) -> usize {
        self.fields().filter(|(_, f)| f.is_found()).count()
    }

    /// True when no field was located.
    pub fn is_empty(&self) -> bool {
        self.found_count() == 0
    }
}
