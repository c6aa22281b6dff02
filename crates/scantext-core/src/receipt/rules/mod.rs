//! Rule-based extractors for receipt fields.

pub mod amounts;
pub mod dates;
pub mod patterns;
pub mod phone;
pub mod store;

pub use amounts::{format_grouped, TotalRule};
pub use dates::DateRule;
pub use phone::PhoneRule;
pub use store::{is_store_heading, StoreNameRule};

use serde::Serialize;

use crate::models::receipt::{Field, FieldKind, RawText};

/// Trait for single-field rules.
pub trait FieldRule {
    /// The field this rule fills.
    fn kind(&self) -> FieldKind;

    /// Resolve the field according to the rule's selection policy.
    fn extract(&self, text: &RawText) -> Field;

    /// Every candidate the rule considered, in text order.
    fn candidates(&self, text: &RawText) -> Vec<RuleMatch>;
}

/// Which stage of a rule produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    /// The rule's preferred pattern.
    Primary,
    /// Used only when the primary pattern finds nothing.
    Fallback,
}

/// A candidate value found by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleMatch {
    /// Value the field would take.
    pub value: String,
    /// Byte span in the text the rule searched.
    pub position: Option<(usize, usize)>,
    /// Stage that produced it.
    pub tier: MatchTier,
}

impl RuleMatch {
    pub fn new(value: impl Into<String>, tier: MatchTier) -> Self {
        Self {
            value: value.into(),
            position: None,
            tier,
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}

/// Remove every whitespace character, including line breaks.
pub(crate) fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
