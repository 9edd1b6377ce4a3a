//! Lenient date parsing for heterogeneous exports.
//!
//! Values are tried against a fixed, ordered list of formats and the first
//! successful parse wins. Ambiguous values such as `03/04/2025` therefore
//! resolve day-first. Comparisons are made at day granularity only.

use chrono::NaiveDate;
use recon_model::CellValue;

use crate::parsed::Parsed;

/// Accepted formats, in priority order: `YYYY-MM-DD`, `DD-Mon-YYYY`,
/// `DD/MM/YYYY`, `MM/DD/YYYY`, `DD-MM-YYYY`.
pub const ACCEPTED_DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%d-%b-%Y", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y"];

/// Parses date-like cells against an ordered format list.
#[derive(Debug, Clone, Copy)]
pub struct DateNormalizer {
    formats: &'static [&'static str],
}

impl Default for DateNormalizer {
    fn default() -> Self {
        Self {
            formats: &ACCEPTED_DATE_FORMATS,
        }
    }
}

impl DateNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom ordered format list.
    pub fn with_formats(formats: &'static [&'static str]) -> Self {
        Self { formats }
    }

    pub fn formats(&self) -> &[&'static str] {
        self.formats
    }

    /// Parse a cell into a calendar date.
    pub fn normalize(&self, value: &CellValue) -> Parsed<NaiveDate> {
        match value {
            CellValue::Missing => Parsed::Absent,
            CellValue::Date(date) => Parsed::Value(*date),
            CellValue::Number(number) if number.is_nan() => Parsed::Absent,
            CellValue::Number(_) => Parsed::Malformed(value.as_text().into_owned()),
            CellValue::Text(text) => self.normalize_text(text),
        }
    }

    /// Parse raw text into a calendar date.
    pub fn normalize_text(&self, text: &str) -> Parsed<NaiveDate> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Parsed::Absent;
        }
        self.formats
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
            .map_or_else(|| Parsed::Malformed(trimmed.to_string()), Parsed::Value)
    }
}

/// Signed day difference `later - earlier`, when both cells parse.
pub fn day_difference(
    normalizer: &DateNormalizer,
    earlier: &CellValue,
    later: &CellValue,
) -> Option<i64> {
    let earlier = normalizer.normalize(earlier).value()?;
    let later = normalizer.normalize(later).value()?;
    Some((later - earlier).num_days())
}
