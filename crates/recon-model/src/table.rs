//! Tabular extracts as handed over by a loader.

use std::borrow::Cow;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

static MISSING: CellValue = CellValue::Missing;

/// A single scalar value in a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum CellValue {
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Missing,
}

impl CellValue {
    /// Build a cell from raw text, mapping blank input to `Missing`.
    pub fn from_text(value: impl AsRef<str>) -> Self {
        let value = value.as_ref();
        if value.trim().is_empty() {
            Self::Missing
        } else {
            Self::Text(value.to_string())
        }
    }

    /// True for `Missing` and for text that is only whitespace.
    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(value) => value.is_nan(),
            Self::Date(_) => false,
        }
    }

    /// String form of the value; `Missing` renders as an empty string.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(text) => Cow::Borrowed(text.as_str()),
            Self::Number(value) => Cow::Owned(format_numeric(*value)),
            Self::Date(date) => Cow::Owned(date.format("%Y-%m-%d").to_string()),
            Self::Missing => Cow::Borrowed(""),
        }
    }

    /// Trimmed, upper-cased text used by every case-insensitive rule.
    pub fn upper(&self) -> String {
        self.as_text().trim().to_uppercase()
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::from_text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

/// One row of a dataset: field names in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing an existing value with the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: CellValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(name, value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Value of a field, or `Missing` when the field does not exist.
    pub fn value(&self, name: &str) -> &CellValue {
        self.get(name).unwrap_or(&MISSING)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// An ordered sequence of records sharing one column set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    name: String,
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, columns: Vec<String>, rows: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Build a dataset from raw text cells, positionally aligned with `columns`.
    ///
    /// Blank cells become `Missing`; short rows are padded with `Missing`.
    pub fn from_text_rows<C, R, S>(name: &str, columns: C, rows: R) -> Self
    where
        C: IntoIterator,
        C::Item: AsRef<str>,
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|column| column.as_ref().to_string())
            .collect();
        let rows = rows
            .into_iter()
            .map(|cells| {
                let mut cells = cells.into_iter();
                let mut record = Record::new();
                for column in &columns {
                    let value = cells
                        .next()
                        .map_or(CellValue::Missing, CellValue::from_text);
                    record.insert(column.clone(), value);
                }
                record
            })
            .collect();
        Self::new(name, columns, rows)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|column| column == name)
    }
}

/// Normalize a subject identifier for joins and grouping: trimmed, upper-case.
pub fn normalize_subject(value: &CellValue) -> String {
    value.upper()
}

/// Formats a floating-point number without trailing zeros after the decimal point.
///
/// ```
/// use recon_model::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(40.0), "40");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_missing() {
        assert_eq!(CellValue::from_text("   "), CellValue::Missing);
        assert!(CellValue::Text(" ".to_string()).is_missing());
        assert!(!CellValue::from_text("N").is_missing());
    }

    #[test]
    fn record_value_defaults_to_missing() {
        let record = Record::new().with("USUBJID", "001");
        assert_eq!(record.value("USUBJID").as_text(), "001");
        assert_eq!(record.value("AESER"), &CellValue::Missing);
    }

    #[test]
    fn record_insert_replaces_existing_field() {
        let mut record = Record::new().with("AESER", "N");
        record.insert("AESER", CellValue::from_text("Y"));
        assert_eq!(record.len(), 1);
        assert_eq!(record.value("AESER").as_text(), "Y");
    }

    #[test]
    fn subject_normalization_trims_and_uppercases() {
        assert_eq!(normalize_subject(&CellValue::from_text("  s-001 ")), "S-001");
        assert_eq!(normalize_subject(&CellValue::Number(1.0)), "1");
    }

    #[test]
    fn from_text_rows_pads_short_rows() {
        let ds = Dataset::from_text_rows("AE", ["USUBJID", "AETERM"], [vec!["001"]]);
        assert_eq!(ds.len(), 1);
        assert!(ds.rows()[0].value("AETERM").is_missing());
    }
}
