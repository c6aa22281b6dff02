//! Receipt extractor combining the four field rules.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::error::ConfigError;
use crate::models::config::ExtractionConfig;
use crate::models::receipt::{ExtractionResult, Field, FieldKind, RawText};

use super::rules::{
    patterns::{currency_pattern, long_date_pattern, phone_pattern},
    DateRule, FieldRule, PhoneRule, RuleMatch, StoreNameRule, TotalRule,
};
use super::FieldExtractor;

lazy_static! {
    static ref DEFAULT_EXTRACTOR: ReceiptExtractor =
        ReceiptExtractor::with_config(ExtractionConfig::default()).unwrap();
}

/// Candidates a rule considered for one field, and what it chose.
#[derive(Debug, Clone, Serialize)]
pub struct FieldExplanation {
    pub kind: FieldKind,
    pub chosen: Field,
    pub candidates: Vec<RuleMatch>,
}

/// Deterministic receipt field extractor.
///
/// Holds only compiled patterns; cloning is cheap and one instance can be
/// shared between threads.
#[derive(Debug, Clone)]
pub struct ReceiptExtractor {
    config: ExtractionConfig,
    store: StoreNameRule,
    date: DateRule,
    phone: PhoneRule,
    total: TotalRule,
}

impl ReceiptExtractor {
    /// Extractor with the default Indonesian rules.
    pub fn new() -> Self {
        DEFAULT_EXTRACTOR.clone()
    }

    /// Build an extractor from custom locale data.
    pub fn with_config(config: ExtractionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let store = StoreNameRule::new(config.store_name_min_chars);
        let date = DateRule::new(long_date_pattern(&config)?, &config.month_names);
        let phone = PhoneRule::new(phone_pattern(&config)?);
        let total = TotalRule::new(
            currency_pattern(&config)?,
            &config.currency_symbol,
            config.thousands_separator,
        );

        Ok(Self {
            config,
            store,
            date,
            phone,
            total,
        })
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    fn rule(&self, kind: FieldKind) -> &dyn FieldRule {
        match kind {
            FieldKind::StoreName => &self.store,
            FieldKind::Date => &self.date,
            FieldKind::Phone => &self.phone,
            FieldKind::Total => &self.total,
        }
    }

    /// Every candidate per field alongside the chosen value.
    pub fn explain(&self, raw: &RawText) -> Vec<FieldExplanation> {
        FieldKind::ALL
            .into_iter()
            .map(|kind| {
                let rule = self.rule(kind);
                FieldExplanation {
                    kind,
                    chosen: rule.extract(raw),
                    candidates: rule.candidates(raw),
                }
            })
            .collect()
    }

    /// Calendar date of an extracted date field.
    pub fn parse_date(&self, date: &Field) -> Option<NaiveDate> {
        date.value().and_then(|d| self.date.parse(d))
    }

    /// Numeric value of an extracted total field.
    pub fn parse_total(&self, total: &Field) -> Option<Decimal> {
        total.value().and_then(|t| self.total.parse(t))
    }
}

impl Default for ReceiptExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ReceiptExtractor {
    fn extract(&self, raw: &RawText) -> ExtractionResult {
        let result = ExtractionResult {
            store_name: self.store.extract(raw),
            date: self.date.extract(raw),
            phone: self.phone.extract(raw),
            total: self.total.extract(raw),
        };

        debug!(
            "Extracted {}/4 fields from {} lines",
            result.found_count(),
            raw.len()
        );
        for (kind, field) in result.fields() {
            debug!("  {}: {:?}", kind, field);
        }

        result
    }
}
