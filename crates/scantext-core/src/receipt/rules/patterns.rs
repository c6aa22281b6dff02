//! Regex patterns for receipt field extraction.
//!
//! Digit classes are ASCII (`[0-9]`); OCR output for receipts uses Latin
//! digits. Locale-dependent patterns are built from [`ExtractionConfig`].

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ConfigError;
use crate::models::config::ExtractionConfig;

lazy_static! {
    // D/M/Y, D-M-Y, mixed separators; 4-digit years tried before 2-digit ones
    pub static ref NUMERIC_DATE: Regex = Regex::new(
        r"[0-9]{1,2}[/\-][0-9]{1,2}[/\-](?:[0-9]{4}|[0-9]{2})"
    ).unwrap();

    pub static ref NUMERIC_DATE_PARTS: Regex = Regex::new(
        r"^([0-9]{1,2})[/\-]([0-9]{1,2})[/\-]([0-9]{4}|[0-9]{2})$"
    ).unwrap();

    // Maximal runs of digits
    pub static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// `(?:+62|08)[0-9]{8,13}` for the default configuration.
pub fn phone_pattern(config: &ExtractionConfig) -> Result<Regex, ConfigError> {
    let prefixes = config
        .phone_prefixes
        .iter()
        .map(|p| regex::escape(p.trim()))
        .collect::<Vec<_>>()
        .join("|");

    build(
        "phone_prefixes",
        &format!(
            r"(?:{})[0-9]{{{},{}}}",
            prefixes, config.phone_min_digits, config.phone_max_digits
        ),
    )
}

/// `D <month> YYYY`, case-insensitive, capturing day, month name and year.
pub fn long_date_pattern(config: &ExtractionConfig) -> Result<Regex, ConfigError> {
    let months = config
        .month_names
        .iter()
        .map(|m| regex::escape(m.trim()))
        .collect::<Vec<_>>()
        .join("|");

    build(
        "month_names",
        &format!(r"(?i)([0-9]{{1,2}})\s+({})\s+([0-9]{{4}})", months),
    )
}

/// `Rp\s?[\d.]+` for the default configuration.
pub fn currency_pattern(config: &ExtractionConfig) -> Result<Regex, ConfigError> {
    build(
        "currency_symbol",
        &format!(
            r"{}\s?[0-9{}]+",
            regex::escape(config.currency_symbol.trim()),
            regex::escape(&config.thousands_separator.to_string())
        ),
    )
}

fn build(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|e| ConfigError::Invalid {
        field,
        reason: e.to_string(),
    })
}
