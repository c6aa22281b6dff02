//! Configuration structures for the scanning pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::report::Language;

/// Main configuration for scantext.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Smart-extract locale data.
    pub extraction: ExtractionConfig,

    /// OCR engine configuration.
    pub ocr: OcrConfig,

    /// Model configuration.
    pub models: ModelConfig,

    /// Output and history configuration.
    pub output: OutputConfig,
}

/// Locale data driving the receipt field rules.
///
/// The defaults describe Indonesian receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Month names for long-form dates; index 0 is January.
    pub month_names: Vec<String>,

    /// Accepted phone prefixes, tried in order.
    pub phone_prefixes: Vec<String>,

    /// Minimum number of digits after the phone prefix.
    pub phone_min_digits: usize,

    /// Maximum number of digits after the phone prefix.
    pub phone_max_digits: usize,

    /// Currency symbol preceding amounts.
    pub currency_symbol: String,

    /// Thousands separator in amounts.
    pub thousands_separator: char,

    /// Minimum trimmed character count for a store-name line.
    pub store_name_min_chars: usize,
}

pub const INDONESIAN_MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            month_names: INDONESIAN_MONTHS.iter().map(|m| m.to_string()).collect(),
            phone_prefixes: vec!["+62".to_string(), "08".to_string()],
            phone_min_digits: 8,
            phone_max_digits: 13,
            currency_symbol: "Rp".to_string(),
            thousands_separator: '.',
            store_name_min_chars: 4,
        }
    }
}

impl ExtractionConfig {
    /// Check that the rules can be built from this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.month_names.is_empty() {
            return Err(ConfigError::Empty("month_names"));
        }
        if let Some(pos) = self.month_names.iter().position(|m| m.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "month_names",
                reason: format!("entry {} is blank", pos + 1),
            });
        }

        if self.phone_prefixes.is_empty() {
            return Err(ConfigError::Empty("phone_prefixes"));
        }
        if self.phone_prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "phone_prefixes",
                reason: "blank prefix".to_string(),
            });
        }

        if self.phone_min_digits == 0 {
            return Err(ConfigError::Invalid {
                field: "phone_min_digits",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.phone_min_digits > self.phone_max_digits {
            return Err(ConfigError::Invalid {
                field: "phone_max_digits",
                reason: format!(
                    "{} is below phone_min_digits ({})",
                    self.phone_max_digits, self.phone_min_digits
                ),
            });
        }

        if self.currency_symbol.trim().is_empty() {
            return Err(ConfigError::Empty("currency_symbol"));
        }

        let sep = self.thousands_separator;
        if sep.is_ascii_digit() || sep.is_whitespace() {
            return Err(ConfigError::Invalid {
                field: "thousands_separator",
                reason: format!("{:?} cannot separate digit groups", sep),
            });
        }

        Ok(())
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Drop recognized boxes below this confidence (0.0 - 1.0).
    pub min_confidence: f32,

    /// Keep `[UNK]` tokens emitted by the recognizer instead of blanking them.
    pub keep_unknown_tokens: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.0, // CTC confidence scores are inherently low
            keep_unknown_tokens: false,
        }
    }
}

/// Model file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

/// Output preferences.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Label language for summaries and documents.
    pub language: Language,

    /// Append every scan to the history file.
    pub record_history: bool,
}

impl ScanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.models.model_dir.join(model_name)
    }
}
