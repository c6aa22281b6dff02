//! Phone number extraction.
//!
//! OCR often splits numbers with stray spaces or line breaks, so the whole
//! text is searched with all whitespace removed.

use regex::Regex;

use super::{strip_whitespace, FieldRule, MatchTier, RuleMatch};
use crate::models::receipt::{Field, FieldKind, RawText};

/// Leftmost prefixed digit run in the whitespace-free text.
#[derive(Debug, Clone)]
pub struct PhoneRule {
    pattern: Regex,
}

impl PhoneRule {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl FieldRule for PhoneRule {
    fn kind(&self) -> FieldKind {
        FieldKind::Phone
    }

    fn extract(&self, text: &RawText) -> Field {
        let compact = strip_whitespace(&text.joined());
        self.pattern
            .find(&compact)
            .map(|m| Field::found(m.as_str()))
            .unwrap_or(Field::NotFound)
    }

    fn candidates(&self, text: &RawText) -> Vec<RuleMatch> {
        let compact = strip_whitespace(&text.joined());
        self.pattern
            .find_iter(&compact)
            .map(|m| RuleMatch::new(m.as_str(), MatchTier::Primary).with_position(m.start(), m.end()))
            .collect()
    }
}
