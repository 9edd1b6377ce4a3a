//! Discrepancy formatting and summary metrics.

use std::collections::{BTreeMap, HashMap};

use recon_model::{Discrepancy, IssueBreakdown, IssueTable, Metrics, PillarKey, ReconOutcome};

use crate::finding::Finding;

/// Number of subjects listed in [`IssueBreakdown::top_subjects`].
pub const TOP_SUBJECTS: usize = 10;

/// Coerce pillar findings into the fixed output table.
///
/// `total` is the row count of the primary dataset.
pub fn format_output(pillar: PillarKey, findings: Vec<Finding>, total: usize) -> ReconOutcome {
    if findings.is_empty() {
        return ReconOutcome {
            pillar: Some(pillar),
            table: IssueTable::NoIssues,
            metrics: Metrics::compute(total, 0),
            breakdown: IssueBreakdown::default(),
        };
    }

    let discrepancies: Vec<Discrepancy> = findings
        .into_iter()
        .map(|finding| finding.into_discrepancy(pillar))
        .collect();

    ReconOutcome {
        pillar: Some(pillar),
        metrics: Metrics::compute(total, discrepancies.len()),
        breakdown: breakdown(&discrepancies),
        table: IssueTable::Issues(discrepancies),
    }
}

/// Counts per issue type and the subjects with the most discrepancies.
///
/// Ties in the subject ranking are broken by subject key.
pub fn breakdown(discrepancies: &[Discrepancy]) -> IssueBreakdown {
    let mut by_issue: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_subject: HashMap<&str, usize> = HashMap::new();
    for discrepancy in discrepancies {
        *by_issue.entry(discrepancy.issue_type.clone()).or_default() += 1;
        *by_subject.entry(discrepancy.subject.as_str()).or_default() += 1;
    }

    let mut top_subjects: Vec<(String, usize)> = by_subject
        .into_iter()
        .map(|(subject, count)| (subject.to_string(), count))
        .collect();
    top_subjects.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_subjects.truncate(TOP_SUBJECTS);

    IssueBreakdown {
        by_issue,
        top_subjects,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_findings_render_no_issues() {
        let outcome = format_output(PillarKey::Labs, Vec::new(), 7);
        assert_eq!(outcome.table, IssueTable::NoIssues);
        assert_eq!(outcome.metrics, Metrics::compute(7, 0));
    }

    #[test]
    fn metrics_count_every_finding() {
        let findings = vec![
            Finding::new("001", "Date Mismatch"),
            Finding::new("001", "Sample Issue"),
            Finding::new("002", "Date Mismatch"),
        ];
        let outcome = format_output(PillarKey::Labs, findings, 4);
        assert_eq!(outcome.metrics.issues, 3);
        assert_eq!(outcome.metrics.rate, 75.0);
        assert_eq!(outcome.breakdown.by_issue["Date Mismatch"], 2);
        assert_eq!(outcome.breakdown.top_subjects[0], ("001".to_string(), 2));
    }

    #[test]
    fn top_subjects_are_capped() {
        let discrepancies: Vec<Discrepancy> = (0..15)
            .map(|n| Finding::new(format!("S{n:02}"), "Orphan ConMed").into_discrepancy(PillarKey::AeConMed))
            .collect();
        let summary = breakdown(&discrepancies);
        assert_eq!(summary.top_subjects.len(), TOP_SUBJECTS);
        assert_eq!(summary.top_subjects[0].0, "S00");
    }
}
