//! Store name: the first all-caps heading line.

use super::{FieldRule, MatchTier, RuleMatch};
use crate::models::receipt::{Field, FieldKind, RawText};

/// Picks the earliest line that looks like an all-caps store heading.
#[derive(Debug, Clone)]
pub struct StoreNameRule {
    min_chars: usize,
}

impl StoreNameRule {
    pub fn new(min_chars: usize) -> Self {
        Self { min_chars }
    }
}

impl Default for StoreNameRule {
    fn default() -> Self {
        Self::new(4)
    }
}

/// A trimmed line of at least `min_chars` characters, with at least one
/// uppercase letter and no lowercase ones.
pub fn is_store_heading(line: &str, min_chars: usize) -> bool {
    let line = line.trim();
    line.chars().count() >= min_chars
        && line.chars().any(char::is_uppercase)
        && !line.chars().any(char::is_lowercase)
}

impl FieldRule for StoreNameRule {
    fn kind(&self) -> FieldKind {
        FieldKind::StoreName
    }

    fn extract(&self, text: &RawText) -> Field {
        text.lines()
            .iter()
            .find(|line| is_store_heading(line, self.min_chars))
            .map(|line| Field::found(line.trim()))
            .unwrap_or(Field::NotFound)
    }

    fn candidates(&self, text: &RawText) -> Vec<RuleMatch> {
        let mut results = Vec::new();
        let mut offset = 0;

        for line in text.lines() {
            if is_store_heading(line, self.min_chars) {
                let start = offset + (line.len() - line.trim_start().len());
                let trimmed = line.trim();
                results.push(
                    RuleMatch::new(trimmed, MatchTier::Primary)
                        .with_position(start, start + trimmed.len()),
                );
            }
            // +1 for the joining newline
            offset += line.len() + 1;
        }

        results
    }
}
