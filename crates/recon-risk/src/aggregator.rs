//! Group-level risk aggregation.

use recon_model::{
    Dataset, GroupLevel, ReconError, Result, RiskRecord, RiskTable, RiskThresholds, ScoreMetric,
    normalize_subject,
};
use recon_transform::{ColumnResolver, Parsed, Role, parse_number};
use tracing::{debug, info, info_span, warn};

use crate::score::{DeviationCounts, ScoreInputs, normalize_score, weighted_score};

/// Count columns found in a risk table. Each is present only when the
/// dataset actually has it.
#[derive(Debug, Clone, Default)]
struct CountColumns {
    queries: Option<String>,
    saes: Option<String>,
    major: Option<String>,
    minor: Option<String>,
    total: Option<String>,
    subjects: Option<String>,
}

impl CountColumns {
    fn resolve(dataset: &Dataset, group_column: &str) -> Self {
        let find = |role: Role| {
            ColumnResolver::resolve(dataset.columns(), role)
                .column()
                .filter(|column| *column != group_column && dataset.has_column(column))
                .map(str::to_string)
        };
        Self {
            queries: find(Role::QueryCount),
            saes: find(Role::SaeCount),
            major: find(Role::MajorDeviations),
            minor: find(Role::MinorDeviations),
            total: find(Role::TotalDeviations),
            subjects: find(Role::SubjectCount),
        }
    }

    /// Distinct count columns in dataset column order.
    fn in_source_order(&self, dataset: &Dataset) -> Vec<String> {
        let used = [
            &self.queries,
            &self.saes,
            &self.major,
            &self.minor,
            &self.total,
            &self.subjects,
        ];
        dataset
            .columns()
            .iter()
            .filter(|column| used.iter().any(|c| c.as_deref() == Some(column.as_str())))
            .cloned()
            .collect()
    }
}

/// Summed counts of one group, in first-appearance order.
struct GroupTotals {
    group: String,
    sums: Vec<(String, f64)>,
}

impl GroupTotals {
    fn get(&self, column: Option<&str>) -> Option<f64> {
        let column = column?;
        self.sums
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| *value)
    }
}

/// Ranks groups of a count table by weighted risk.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskAggregator {
    thresholds: RiskThresholds,
}

impl RiskAggregator {
    pub fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Score every group and sort descending by normalized score.
    ///
    /// Rows with the same group value are summed first; subject ids are
    /// compared after [`normalize_subject`]. Rows without a group value are
    /// ignored; unparseable counts contribute zero.
    pub fn aggregate(&self, dataset: &Dataset, level: GroupLevel) -> Result<Vec<RiskRecord>> {
        let group_role = match level {
            GroupLevel::Site => Role::Site,
            GroupLevel::Subject => Role::SubjectGroup,
            GroupLevel::Country => Role::Country,
        };
        let group_column = ColumnResolver::resolve(dataset.columns(), group_role)
            .column()
            .filter(|column| dataset.has_column(column))
            .map(str::to_string)
            .ok_or_else(|| ReconError::Schema {
                dataset: dataset.name().to_string(),
                role: group_role.name().to_string(),
            })?;

        let counts = CountColumns::resolve(dataset, &group_column);
        let count_columns = counts.in_source_order(dataset);
        debug!(group_column = %group_column, columns = ?count_columns, "risk columns resolved");

        let mut groups: Vec<GroupTotals> = Vec::new();
        for (row, record) in dataset.rows().iter().enumerate() {
            let group_value = record.value(&group_column);
            if group_value.is_missing() {
                debug!(row, "row without group value skipped");
                continue;
            }
            let group = match level {
                GroupLevel::Subject => normalize_subject(group_value),
                GroupLevel::Site | GroupLevel::Country => group_value.as_text().trim().to_string(),
            };
            let index = match groups.iter().position(|totals| totals.group == group) {
                Some(index) => index,
                None => {
                    groups.push(GroupTotals {
                        group,
                        sums: count_columns.iter().map(|column| (column.clone(), 0.0)).collect(),
                    });
                    groups.len() - 1
                }
            };
            for (column, sum) in &mut groups[index].sums {
                match parse_number(record.value(column)) {
                    Parsed::Value(value) => *sum += value,
                    Parsed::Malformed(_) => debug!(row, column = %column, "non-numeric count ignored"),
                    Parsed::Absent => {}
                }
            }
        }

        let mut records: Vec<RiskRecord> = groups
            .into_iter()
            .map(|totals| self.score_group(&counts, totals))
            .collect();
        records.sort_by(|a, b| b.normalized_score.total_cmp(&a.normalized_score));
        Ok(records)
    }

    fn score_group(&self, counts: &CountColumns, totals: GroupTotals) -> RiskRecord {
        let deviations = match (
            totals.get(counts.major.as_deref()),
            totals.get(counts.minor.as_deref()),
            totals.get(counts.total.as_deref()),
        ) {
            (Some(major), Some(minor), _) => DeviationCounts::Split { major, minor },
            (_, _, Some(total)) => DeviationCounts::Total(total),
            _ => DeviationCounts::Unknown,
        };
        let inputs = ScoreInputs {
            queries: totals.get(counts.queries.as_deref()).unwrap_or(0.0),
            saes: totals.get(counts.saes.as_deref()).unwrap_or(0.0),
            deviations,
        };
        let raw_score = weighted_score(&inputs);

        let (normalized_score, metric) = match totals.get(counts.subjects.as_deref()) {
            Some(subjects) => (normalize_score(raw_score, subjects), ScoreMetric::PerSubject),
            None => (raw_score, ScoreMetric::Total),
        };

        RiskRecord {
            group: totals.group,
            aggregates: totals.sums,
            raw_score,
            normalized_score,
            metric,
            band: self.thresholds.classify(normalized_score),
        }
    }

    /// Like [`RiskAggregator::aggregate`], but failures become an error table.
    pub fn analyze(&self, dataset: &Dataset, level: &str) -> RiskTable {
        let span = info_span!("risk", level, rows = dataset.len());
        let _guard = span.enter();

        let result = level
            .parse::<GroupLevel>()
            .and_then(|level| self.aggregate(dataset, level));
        match result {
            Ok(records) => {
                info!(groups = records.len(), "risk aggregated");
                RiskTable::Records(records)
            }
            Err(err) => {
                warn!(error = %err, "risk aggregation aborted");
                RiskTable::Error(err.to_string())
            }
        }
    }
}

/// Rank `dataset` by weighted risk at `level` (`Site`, `Subject`, or `Country`).
pub fn analyze_risk(dataset: &Dataset, level: &str, thresholds: &RiskThresholds) -> RiskTable {
    RiskAggregator::new(*thresholds).analyze(dataset, level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_column_is_excluded_from_counts() {
        let ds = Dataset::from_text_rows(
            "RISK",
            ["SubjectID", "Queries", "SAEs"],
            [vec!["001", "2", "1"]],
        );
        let records = RiskAggregator::default()
            .aggregate(&ds, GroupLevel::Subject)
            .unwrap();
        assert_eq!(records[0].metric, ScoreMetric::Total);
        assert_eq!(records[0].raw_score, 7.0);
        assert_eq!(
            records[0].aggregates,
            vec![("Queries".to_string(), 2.0), ("SAEs".to_string(), 1.0)]
        );
    }

    #[test]
    fn missing_group_column_is_schema_error() {
        let ds = Dataset::from_text_rows("RISK", ["Region", "Queries"], [vec!["EU", "2"]]);
        let err = RiskAggregator::default()
            .aggregate(&ds, GroupLevel::Country)
            .unwrap_err();
        assert!(matches!(err, ReconError::Schema { .. }));
    }
}
