//! Core data model for clinical data reconciliation.
//!
//! Everything in this crate is constructed fresh per call and never mutated
//! afterwards, so values can be shared freely across threads.

pub mod discrepancy;
pub mod error;
pub mod options;
pub mod pillar;
pub mod risk;
pub mod table;

pub use discrepancy::{
    Discrepancy, IssueBreakdown, IssueTable, Metrics, NO_ISSUES_MESSAGE, ReconOutcome, round_to,
};
pub use error::{ReconError, Result};
pub use options::{JoinSuffixes, ReconOptions};
pub use pillar::PillarKey;
pub use risk::{GroupLevel, RiskBand, RiskRecord, RiskTable, RiskThresholds, ScoreMetric};
pub use table::{CellValue, Dataset, Record, format_numeric, normalize_subject};
