//! Error types for the scantext-core library.
//!
//! Field extraction itself never fails: a field that cannot be located is
//! reported as [`Field::NotFound`](crate::Field::NotFound). These errors cover
//! the surrounding stack (OCR, configuration, files).

use thiserror::Error;

/// Main error type for the scantext library.
#[derive(Error, Debug)]
pub enum ScanError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Text detection or recognition failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors raised while validating an extraction configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A list that must contain entries is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// A value is present but unusable.
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for the scantext library.
pub type Result<T> = std::result::Result<T, ScanError>;
