//! End-to-end CSV loading tests.

use std::io::Write;

use recon_ingest::{IngestError, read_csv_dataset};
use recon_model::CellValue;
use tempfile::TempDir;

fn write_csv(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
fn dataset_is_named_after_file_stem() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "safety_db.csv", "Subject,Causality\nS-01,Related\n");

    let ds = read_csv_dataset(&path).unwrap();
    assert_eq!(ds.name(), "safety_db");
    assert_eq!(ds.rows()[0].value("Causality").as_text(), "Related");
}

#[test]
fn bom_is_stripped_from_header() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "ae.csv", "\u{feff}USUBJID,AETERM\n001,Headache\n");

    let ds = read_csv_dataset(&path).unwrap();
    assert_eq!(ds.columns()[0], "USUBJID");
    assert_eq!(ds.rows()[0].value("USUBJID").as_text(), "001");
}

#[test]
fn header_only_file_is_an_empty_dataset() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "cm.csv", "USUBJID,CMINDC\n");

    let ds = read_csv_dataset(&path).unwrap();
    assert!(ds.is_empty());
    assert_eq!(ds.columns().len(), 2);
}

#[test]
fn numbers_are_read_as_text() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, "queries.csv", "SubjectID,DaysOpen\n007,45\n");

    let ds = read_csv_dataset(&path).unwrap();
    assert_eq!(ds.rows()[0].value("DaysOpen"), &CellValue::Text("45".to_string()));
}

#[test]
fn missing_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let result = read_csv_dataset(&dir.path().join("absent.csv"));
    assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
}
