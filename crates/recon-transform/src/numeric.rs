//! Numeric parsing.

use recon_model::CellValue;

use crate::parsed::Parsed;

/// Parse a cell as a number.
///
/// Thousands separators and inner spaces are ignored (`"1,200"` is 1200).
/// Blank cells and `NaN` are absent; text that is not a number is malformed.
pub fn parse_number(value: &CellValue) -> Parsed<f64> {
    match value {
        CellValue::Missing => Parsed::Absent,
        CellValue::Number(number) if number.is_nan() => Parsed::Absent,
        CellValue::Number(number) => Parsed::Value(*number),
        CellValue::Date(date) => Parsed::Malformed(date.to_string()),
        CellValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Parsed::Absent;
            }
            let cleaned = trimmed.replace([',', ' ', '\u{a0}'], "");
            match cleaned.parse::<f64>() {
                Ok(number) if number.is_nan() => Parsed::Absent,
                Ok(number) => Parsed::Value(number),
                Err(_) => Parsed::Malformed(trimmed.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_text_and_numbers() {
        assert_eq!(parse_number(&CellValue::from_text(" 45 ")), Parsed::Value(45.0));
        assert_eq!(parse_number(&CellValue::Number(2.5)), Parsed::Value(2.5));
    }

    #[test]
    fn thousands_separators_are_ignored() {
        assert_eq!(parse_number(&CellValue::from_text("1,200")), Parsed::Value(1200.0));
        assert_eq!(parse_number(&CellValue::from_text("1,234.5")), Parsed::Value(1234.5));
        assert_eq!(parse_number(&CellValue::from_text("12 000")), Parsed::Value(12000.0));
    }

    #[test]
    fn blank_and_nan_are_absent() {
        assert!(parse_number(&CellValue::Missing).is_absent());
        assert!(parse_number(&CellValue::Text("nan".to_string())).is_absent());
        assert!(parse_number(&CellValue::Number(f64::NAN)).is_absent());
    }

    #[test]
    fn non_numeric_text_is_malformed() {
        assert_eq!(
            parse_number(&CellValue::from_text("many")),
            Parsed::Malformed("many".to_string())
        );
    }
}
