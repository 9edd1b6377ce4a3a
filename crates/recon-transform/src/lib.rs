//! Transformation utilities shared by the reconciliation pillars.
//!
//! - **resolver**: canonical column roles and the substring heuristics behind them
//! - **dates**: lenient multi-format date parsing
//! - **numeric**: numeric parsing with an explicit malformed state
//! - **join**: subject-keyed outer joins with provenance

pub mod dates;
pub mod join;
pub mod numeric;
pub mod parsed;
pub mod resolver;

pub use dates::{ACCEPTED_DATE_FORMATS, DateNormalizer, day_difference};
pub use join::{DatasetJoiner, JoinedDataset, JoinedRecord, Provenance, SubjectIndex};
pub use numeric::parse_number;
pub use parsed::Parsed;
pub use resolver::{ColumnResolver, Resolution, Role, RoleMap};
