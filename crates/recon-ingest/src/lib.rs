//! Loading of clinical extracts into [`recon_model::Dataset`]s.
//!
//! CSV files are parsed with Polars and every column is read as text, so
//! identifiers such as `001` keep their leading zeros. Numeric and date
//! interpretation happens later, per rule.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use recon_ingest::read_csv_dataset;
//!
//! let edc = read_csv_dataset(Path::new("exports/ae.csv"))?;
//! ```

mod csv;
mod error;
mod frame;
mod polars_utils;

pub use crate::csv::{read_csv_dataset, read_csv_frame, validate_encoding};
pub use error::{IngestError, Result};
pub use frame::dataframe_to_dataset;
pub use polars_utils::{any_to_cell, any_to_string};
