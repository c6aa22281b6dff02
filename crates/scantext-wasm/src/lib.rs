//! WASM bindings for receipt field extraction.
//!
//! OCR happens on the JavaScript side; these bindings take the recognized
//! text and return the extracted fields, the summary table, or the final
//! plain-text document.

use js_sys::Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use scantext_core::{
    ExtractionConfig, ExtractionResult, FieldExtractor, FinalDocument, Language, RawText,
    ReceiptExtractor, Summary,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract store name, date, phone and total from OCR text.
#[wasm_bindgen]
pub fn extract_fields(text: &str) -> Result<JsValue, JsValue> {
    let result = scantext_core::extract(&RawText::from_text(text));
    to_js(&result)
}

/// Summary table rows (`label`, `value`, `found`) for the given language.
#[wasm_bindgen]
pub fn summary_rows(text: &str, lang: Option<String>) -> Result<JsValue, JsValue> {
    let language = parse_language(lang.as_deref())?;
    let result = scantext_core::extract(&RawText::from_text(text));
    to_js(&Summary::new(&result, language).rows)
}

/// Plain-text document: summary followed by the OCR text.
#[wasm_bindgen]
pub fn render_document(text: &str, lang: Option<String>) -> Result<String, JsValue> {
    let language = parse_language(lang.as_deref())?;
    let raw = RawText::from_text(text);
    let result = scantext_core::extract(&raw);
    Ok(FinalDocument::new(&result, &raw, language).render())
}

/// Receipt scanner class for browser use.
#[wasm_bindgen]
pub struct ReceiptScanner {
    extractor: ReceiptExtractor,
    language: Language,
}

#[wasm_bindgen]
impl ReceiptScanner {
    /// Create a scanner, optionally from an extraction config as JSON.
    ///
    /// Missing keys take their defaults; an invalid config is rejected.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ReceiptScanner, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => serde_json::from_str::<ExtractionConfig>(json)
                .map_err(|e| JsValue::from_str(&format!("Invalid config: {}", e)))?,
            _ => ExtractionConfig::default(),
        };

        let extractor =
            ReceiptExtractor::with_config(config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            extractor,
            language: Language::default(),
        })
    }

    /// Set the label language (`id` or `en`).
    #[wasm_bindgen]
    pub fn set_language(&mut self, lang: &str) -> Result<(), JsValue> {
        self.language = parse_language(Some(lang))?;
        Ok(())
    }

    /// Extract fields from newline-separated text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.extractor.extract_from_text(text))
    }

    /// Extract fields from an array of recognized lines.
    #[wasm_bindgen]
    pub fn extract_lines(&self, lines: Array) -> Result<JsValue, JsValue> {
        let raw = lines_to_raw(&lines);
        to_js(&self.extractor.extract(&raw))
    }

    /// Extraction result with parsed values and the candidates each rule saw.
    #[wasm_bindgen]
    pub fn extract_with_details(&self, text: &str) -> Result<JsValue, JsValue> {
        let raw = RawText::from_text(text);
        let result = self.extractor.extract(&raw);

        #[derive(Serialize)]
        struct Details<'a> {
            result: &'a ExtractionResult,
            date_iso: Option<String>,
            amount: Option<String>,
            explanation: Vec<scantext_core::FieldExplanation>,
        }

        let details = Details {
            date_iso: self.extractor.parse_date(&result.date).map(|d| d.to_string()),
            amount: self.extractor.parse_total(&result.total).map(|d| d.to_string()),
            explanation: self.extractor.explain(&raw),
            result: &result,
        };

        to_js(&details)
    }

    /// Summary rows in the scanner's language.
    #[wasm_bindgen]
    pub fn summary(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.extractor.extract_from_text(text);
        to_js(&Summary::new(&result, self.language).rows)
    }

    /// Final document in the scanner's language.
    #[wasm_bindgen]
    pub fn render(&self, text: &str) -> String {
        let raw = RawText::from_text(text);
        let result = self.extractor.extract(&raw);
        FinalDocument::new(&result, &raw, self.language).render()
    }

    /// Parse an extracted total (e.g. "Rp 23.500") into a plain decimal string.
    #[wasm_bindgen]
    pub fn parse_total(&self, total: &str) -> Option<String> {
        self.extractor
            .parse_total(&scantext_core::Field::found(total))
            .map(|d| d.to_string())
    }

    /// Active extraction config as JSON.
    #[wasm_bindgen]
    pub fn config_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.extractor.config()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

fn parse_language(lang: Option<&str>) -> Result<Language, JsValue> {
    match lang {
        None => Ok(Language::default()),
        Some(code) => code.parse::<Language>().map_err(|e| JsValue::from_str(&e)),
    }
}

fn lines_to_raw(lines: &Array) -> RawText {
    let mut skipped = 0;
    let raw: RawText = lines
        .iter()
        .filter_map(|value| {
            let line = value.as_string();
            if line.is_none() {
                skipped += 1;
            }
            line
        })
        .collect();

    if skipped > 0 {
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "scantext: skipped {} non-string lines",
            skipped
        )));
    }

    raw
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}
