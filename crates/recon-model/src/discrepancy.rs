//! Discrepancy tables and summary metrics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pillar::PillarKey;

/// Informational row emitted when a pillar finds nothing.
pub const NO_ISSUES_MESSAGE: &str = "No Issues Found";

/// A single flagged inconsistency between or within datasets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Discrepancy {
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Pillar")]
    pub pillar: String,
    #[serde(rename = "Issue")]
    pub issue_type: String,
    #[serde(rename = "Detail")]
    pub detail: String,
    #[serde(rename = "Action")]
    pub action: String,
}

/// Row counts for one reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    #[serde(rename = "Total")]
    pub total: usize,
    #[serde(rename = "Issues")]
    pub issues: usize,
    #[serde(rename = "Rate")]
    pub rate: f64,
}

impl Metrics {
    /// `rate` is the issue percentage rounded to one decimal, or 0 for an empty source.
    pub fn compute(total: usize, issues: usize) -> Self {
        let rate = if total == 0 {
            0.0
        } else {
            round_to(issues as f64 / total as f64 * 100.0, 1)
        };
        Self {
            total,
            issues,
            rate,
        }
    }
}

/// Round to `places` decimals, ties to even.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// Fixed-shape output table of a reconciliation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "rows")]
pub enum IssueTable {
    Issues(Vec<Discrepancy>),
    /// Renders as a single "No Issues Found" row.
    NoIssues,
    /// One-row `{Error: ...}` sentinel; callers must check for it.
    Error(String),
}

impl IssueTable {
    pub fn discrepancies(&self) -> &[Discrepancy] {
        match self {
            Self::Issues(issues) => issues,
            Self::NoIssues | Self::Error(_) => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn headers(&self) -> Vec<&'static str> {
        match self {
            Self::Issues(_) => vec!["Subject", "Issue", "Detail", "Action"],
            Self::NoIssues => vec!["Status"],
            Self::Error(_) => vec!["Error"],
        }
    }

    /// Rows aligned with [`IssueTable::headers`].
    pub fn rows(&self) -> Vec<Vec<String>> {
        match self {
            Self::Issues(issues) => issues
                .iter()
                .map(|issue| {
                    vec![
                        issue.subject.clone(),
                        issue.issue_type.clone(),
                        issue.detail.clone(),
                        issue.action.clone(),
                    ]
                })
                .collect(),
            Self::NoIssues => vec![vec![NO_ISSUES_MESSAGE.to_string()]],
            Self::Error(message) => vec![vec![message.clone()]],
        }
    }
}

/// Issue counts by type plus the subjects carrying the most discrepancies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueBreakdown {
    pub by_issue: BTreeMap<String, usize>,
    pub top_subjects: Vec<(String, usize)>,
}

/// Everything a reconciliation call returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconOutcome {
    pub pillar: Option<PillarKey>,
    pub table: IssueTable,
    pub metrics: Metrics,
    pub breakdown: IssueBreakdown,
}

impl ReconOutcome {
    /// Error sentinel: the error row plus metrics over the primary dataset.
    pub fn error(pillar: Option<PillarKey>, message: impl Into<String>, total: usize) -> Self {
        Self {
            pillar,
            table: IssueTable::Error(message.into()),
            metrics: Metrics::compute(total, 0),
            breakdown: IssueBreakdown::default(),
        }
    }
}
