//! Append-only scan history.
//!
//! The history is owned by the caller. Entries are immutable snapshots and are
//! persisted as JSON lines, one entry per line, so appending never rewrites
//! earlier scans.

use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::receipt::{ExtractionResult, RawText};

/// One past scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the scan was taken.
    pub scanned_at: DateTime<Utc>,

    /// File name or other label of the scanned input.
    pub source: String,

    /// OCR text the fields were extracted from.
    pub raw_text: RawText,

    /// Extracted fields.
    pub result: ExtractionResult,
}

impl HistoryEntry {
    /// Snapshot a scan taken now.
    pub fn new(source: impl Into<String>, raw_text: RawText, result: ExtractionResult) -> Self {
        Self::at(Utc::now(), source, raw_text, result)
    }

    /// Snapshot a scan with an explicit timestamp.
    pub fn at(
        scanned_at: DateTime<Utc>,
        source: impl Into<String>,
        raw_text: RawText,
        result: ExtractionResult,
    ) -> Self {
        Self {
            scanned_at,
            source: source.into(),
            raw_text,
            result,
        }
    }

    /// Append this entry to a JSON-lines history file, creating it if needed.
    pub fn append_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut line = serde_json::to_string(self)?;
        line.push('\n');

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(line.as_bytes())?;

        debug!("Appended history entry for {} to {}", self.source, path.display());
        Ok(())
    }
}

/// Ordered list of past scans, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanHistory {
    entries: Vec<HistoryEntry>,
}

impl ScanHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON-lines history file. A missing file is an empty history;
    /// unreadable lines are skipped with a warning.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let reader = BufReader::new(std::fs::File::open(path)?);
        let mut history = Self::new();

        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(&line) {
                Ok(entry) => history.push(entry),
                Err(e) => warn!("Skipping history line {}: {}", i + 1, e),
            }
        }

        Ok(history)
    }

    /// Append an entry. Existing entries are never modified.
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Entry by 1-based position, as shown to users.
    pub fn get(&self, number: usize) -> Option<&HistoryEntry> {
        number.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
