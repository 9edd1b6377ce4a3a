//! Shared helpers for reconciliation tests.

#![allow(dead_code)]

use recon_model::{Dataset, Discrepancy, ReconOptions, ReconOutcome};
use recon_validate::run_recon;

pub fn dataset(name: &str, columns: &[&str], rows: &[&[&str]]) -> Dataset {
    Dataset::from_text_rows(name, columns, rows.iter().map(|row| row.to_vec()))
}

pub fn run(primary: &Dataset, secondary: Option<&Dataset>, mode: &str) -> ReconOutcome {
    run_recon(primary, secondary, mode, &ReconOptions::default())
}

/// Discrepancies of `issue_type` for `subject`.
pub fn issues_for<'a>(outcome: &'a ReconOutcome, subject: &str, issue_type: &str) -> Vec<&'a Discrepancy> {
    outcome
        .table
        .discrepancies()
        .iter()
        .filter(|d| d.subject == subject && d.issue_type == issue_type)
        .collect()
}
