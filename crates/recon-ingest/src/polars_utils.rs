//! Polars `AnyValue` conversions.

use polars::prelude::AnyValue;
use recon_model::{CellValue, format_numeric};

/// Converts an `AnyValue` to its string form; `Null` becomes an empty string.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => if b { "Y" } else { "N" }.to_string(),
        other => {
            let s = other.to_string();
            // Display wraps some values in quotes
            if s.starts_with('"') && s.ends_with('"') && s.len() >= 2 {
                s[1..s.len() - 1].to_string()
            } else {
                s
            }
        }
    }
}

/// Converts an `AnyValue` to a cell: numbers stay numeric, blanks are missing.
pub fn any_to_cell(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Missing,
        AnyValue::Int8(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int16(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int32(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int64(v) => CellValue::Number(v as f64),
        AnyValue::UInt8(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt16(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt32(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt64(v) => CellValue::Number(v as f64),
        AnyValue::Float32(v) => CellValue::Number(f64::from(v)),
        AnyValue::Float64(v) if v.is_nan() => CellValue::Missing,
        AnyValue::Float64(v) => CellValue::Number(v),
        other => CellValue::from_text(any_to_string(other)),
    }
}
