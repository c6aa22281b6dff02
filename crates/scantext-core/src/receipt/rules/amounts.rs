//! Total amount extraction.
//!
//! Primary: the last currency-prefixed figure in the text (grand totals are
//! printed at the bottom). Fallback, only when no prefixed figure exists: the
//! largest digit run after removing thousands separators, reformatted.

use std::cmp::Ordering;
use std::str::FromStr;

use regex::Regex;
use rust_decimal::Decimal;

use super::patterns::DIGIT_RUN;
use super::{FieldRule, MatchTier, RuleMatch};
use crate::models::receipt::{Field, FieldKind, RawText};

/// Total amount rule.
#[derive(Debug, Clone)]
pub struct TotalRule {
    currency: Regex,
    symbol: String,
    separator: char,
}

impl TotalRule {
    pub fn new(currency: Regex, symbol: &str, separator: char) -> Self {
        Self {
            currency,
            symbol: symbol.trim().to_string(),
            separator,
        }
    }

    fn format_amount(&self, digits: &str) -> String {
        format!("{} {}", self.symbol, format_grouped(normalize_digits(digits), self.separator))
    }

    /// Parse an extracted total (e.g. `Rp 23.500`) into a number.
    ///
    /// Thousands separators are dropped. The other of `.`/`,` is read as the
    /// decimal mark.
    pub fn parse(&self, total: &str) -> Option<Decimal> {
        let total = total.trim();
        let body = total.strip_prefix(self.symbol.as_str()).unwrap_or(total);
        let decimal_mark = if self.separator == ',' { '.' } else { ',' };

        let normalized: String = body
            .chars()
            .filter_map(|c| {
                if c.is_ascii_digit() {
                    Some(c)
                } else if c == decimal_mark {
                    Some('.')
                } else {
                    None
                }
            })
            .collect();

        if normalized.is_empty() {
            return None;
        }

        Decimal::from_str(&normalized).ok()
    }
}

impl FieldRule for TotalRule {
    fn kind(&self) -> FieldKind {
        FieldKind::Total
    }

    fn extract(&self, text: &RawText) -> Field {
        let joined = text.joined();

        if let Some(last) = self.currency.find_iter(&joined).last() {
            return Field::found(last.as_str());
        }

        let stripped = joined.replace(self.separator, "");
        DIGIT_RUN
            .find_iter(&stripped)
            .map(|m| m.as_str())
            .max_by(|a, b| cmp_digit_runs(a, b))
            .map(|digits| Field::found(self.format_amount(digits)))
            .unwrap_or(Field::NotFound)
    }

    fn candidates(&self, text: &RawText) -> Vec<RuleMatch> {
        let joined = text.joined();

        let primary: Vec<RuleMatch> = self
            .currency
            .find_iter(&joined)
            .map(|m| RuleMatch::new(m.as_str(), MatchTier::Primary).with_position(m.start(), m.end()))
            .collect();

        if !primary.is_empty() {
            return primary;
        }

        let stripped = joined.replace(self.separator, "");
        DIGIT_RUN
            .find_iter(&stripped)
            .map(|m| {
                RuleMatch::new(self.format_amount(m.as_str()), MatchTier::Fallback)
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Drop leading zeros, keeping a single `0` for all-zero runs.
fn normalize_digits(digits: &str) -> &str {
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() && !digits.is_empty() {
        "0"
    } else {
        trimmed
    }
}

/// Numeric comparison of ASCII digit runs of any length.
fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a = normalize_digits(a);
    let b = normalize_digits(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Insert `separator` between groups of three digits, from the right.
pub fn format_grouped(digits: &str, separator: char) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut formatted = String::with_capacity(chars.len() + chars.len() / 3);

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push(separator);
        }
        formatted.push(*c);
    }

    formatted
}
