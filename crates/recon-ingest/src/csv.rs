//! CSV reading into Polars frames and reconciliation datasets.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use polars::prelude::*;
use recon_model::Dataset;

use crate::error::{IngestError, Result};
use crate::frame::dataframe_to_dataset;

fn open_error(path: &Path, err: std::io::Error) -> IngestError {
    if err.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::FileRead {
            path: path.to_path_buf(),
            source: err,
        }
    }
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = File::open(path).map_err(|e| open_error(path, e))?;

    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }

    Ok(())
}

/// Reads a CSV file into a Polars DataFrame with every column as text.
pub fn read_csv_frame(path: &Path) -> Result<DataFrame> {
    validate_encoding(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    for name in df.get_column_names() {
        if name.trim().is_empty() {
            return Err(IngestError::EmptyColumnName {
                path: path.to_path_buf(),
            });
        }
    }

    Ok(df)
}

/// Reads a CSV file into a dataset named after the file stem.
pub fn read_csv_dataset(path: &Path) -> Result<Dataset> {
    let df = read_csv_frame(path)?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dataset = dataframe_to_dataset(&name, &df)?;
    tracing::debug!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "loaded CSV dataset"
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_model::CellValue;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_keeps_identifiers_as_text() {
        let file = create_temp_csv(b"USUBJID,AESER\n001,Y\n002,\n");
        let ds = read_csv_dataset(file.path()).unwrap();

        assert_eq!(ds.columns(), &["USUBJID", "AESER"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows()[0].value("USUBJID").as_text(), "001");
        assert_eq!(ds.rows()[1].value("AESER"), &CellValue::Missing);
    }

    #[test]
    fn test_utf16_is_rejected() {
        let file = create_temp_csv(&[0xFF, 0xFE, b'A', 0]);
        let result = read_csv_dataset(file.path());

        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = read_csv_dataset(Path::new("/nonexistent/ae.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
