//! DataFrame to dataset conversion.

use polars::prelude::{AnyValue, DataFrame};
use recon_model::{Dataset, Record};

use crate::error::Result;
use crate::polars_utils::any_to_cell;

/// Convert a frame into a dataset, preserving column and row order.
///
/// A leading UTF-8 byte order mark is stripped from the first column name.
pub fn dataframe_to_dataset(name: &str, df: &DataFrame) -> Result<Dataset> {
    let columns: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|column| column.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows: Vec<Record> = (0..df.height()).map(|_| Record::new()).collect();
    for (column, series) in columns.iter().zip(df.get_columns()) {
        for (idx, record) in rows.iter_mut().enumerate() {
            let value = series.get(idx).unwrap_or(AnyValue::Null);
            record.insert(column.clone(), any_to_cell(value));
        }
    }

    Ok(Dataset::new(name, columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use recon_model::CellValue;

    #[test]
    fn converts_frame_in_order() {
        let df = df! {
            "\u{feff}USUBJID" => &["001", "002"],
            "Queries" => &[Some(3i64), None],
        }
        .unwrap();
        let ds = dataframe_to_dataset("METRICS", &df).unwrap();

        assert_eq!(ds.name(), "METRICS");
        assert_eq!(ds.columns(), &["USUBJID", "Queries"]);
        assert_eq!(ds.rows()[0].value("Queries"), &CellValue::Number(3.0));
        assert_eq!(ds.rows()[1].value("Queries"), &CellValue::Missing);
    }
}
