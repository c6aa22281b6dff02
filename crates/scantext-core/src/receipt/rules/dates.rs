//! Transaction date extraction.
//!
//! Two pattern families are tried in a fixed order over the whole text:
//! numeric `D/M/Y` first, then the long form `D <month> YYYY`. A numeric date
//! anywhere wins over a long-form date anywhere.

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{NUMERIC_DATE, NUMERIC_DATE_PARTS};
use super::{FieldRule, MatchTier, RuleMatch};
use crate::models::receipt::{Field, FieldKind, RawText};

/// Date rule with locale month names.
#[derive(Debug, Clone)]
pub struct DateRule {
    long_form: Regex,
    month_names: Vec<String>,
}

impl DateRule {
    pub fn new(long_form: Regex, month_names: &[String]) -> Self {
        Self {
            long_form,
            month_names: month_names.iter().map(|m| m.trim().to_lowercase()).collect(),
        }
    }

    /// Interpret an extracted date string as a calendar date.
    ///
    /// Returns `None` for strings matching neither family or for impossible
    /// dates such as `31/02/2026`.
    pub fn parse(&self, date: &str) -> Option<NaiveDate> {
        let date = date.trim();

        if let Some(caps) = NUMERIC_DATE_PARTS.captures(date) {
            let day: u32 = caps[1].parse().ok()?;
            let month: u32 = caps[2].parse().ok()?;
            let year = parse_year(&caps[3])?;
            return NaiveDate::from_ymd_opt(year, month, day);
        }

        let caps = self.long_form.captures(date)?;
        if caps.get(0)?.as_str().len() != date.len() {
            return None;
        }
        let day: u32 = caps[1].parse().ok()?;
        let month = self.month_number(&caps[2])?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn month_number(&self, name: &str) -> Option<u32> {
        let name = name.to_lowercase();
        self.month_names
            .iter()
            .position(|m| *m == name)
            .and_then(|i| u32::try_from(i + 1).ok())
    }
}

impl FieldRule for DateRule {
    fn kind(&self) -> FieldKind {
        FieldKind::Date
    }

    fn extract(&self, text: &RawText) -> Field {
        let joined = text.joined();
        NUMERIC_DATE
            .find(&joined)
            .or_else(|| self.long_form.find(&joined))
            .map(|m| Field::found(m.as_str()))
            .unwrap_or(Field::NotFound)
    }

    fn candidates(&self, text: &RawText) -> Vec<RuleMatch> {
        let joined = text.joined();

        let numeric = NUMERIC_DATE
            .find_iter(&joined)
            .map(|m| RuleMatch::new(m.as_str(), MatchTier::Primary).with_position(m.start(), m.end()));
        let long_form = self
            .long_form
            .find_iter(&joined)
            .map(|m| RuleMatch::new(m.as_str(), MatchTier::Fallback).with_position(m.start(), m.end()));

        numeric.chain(long_form).collect()
    }
}

/// Two-digit years: 00-50 are 2000s, 51-99 are 1900s.
fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    if s.len() <= 2 {
        if year <= 50 {
            Some(2000 + year)
        } else {
            Some(1900 + year)
        }
    } else {
        Some(year)
    }
}
