//! Subject-keyed outer joins.
//!
//! Rows are keyed by the normalized subject identifier (trimmed, upper-case).
//! Subjects present on both sides produce one joined record per pair of rows;
//! subjects present on one side keep each of their rows. No input row is
//! dropped.

use std::collections::{BTreeMap, BTreeSet};

use recon_model::{CellValue, Dataset, JoinSuffixes, Record, normalize_subject};
use serde::{Deserialize, Serialize};

/// Name of the normalized key column in flattened joins.
pub const KEY_COLUMN: &str = "KEY";

/// Which side(s) a joined record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    LeftOnly,
    RightOnly,
    Both,
}

impl Provenance {
    #[must_use]
    pub fn swapped(self) -> Self {
        match self {
            Self::LeftOnly => Self::RightOnly,
            Self::RightOnly => Self::LeftOnly,
            Self::Both => Self::Both,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::LeftOnly => "left_only",
            Self::RightOnly => "right_only",
            Self::Both => "both",
        }
    }
}

/// Rows of one dataset grouped by normalized subject key, in input order.
#[derive(Debug, Clone, Default)]
pub struct SubjectIndex<'a> {
    groups: BTreeMap<String, Vec<&'a Record>>,
}

impl<'a> SubjectIndex<'a> {
    pub fn build(dataset: &'a Dataset, key_column: &str) -> Self {
        let mut groups: BTreeMap<String, Vec<&'a Record>> = BTreeMap::new();
        for row in dataset.rows() {
            groups
                .entry(normalize_subject(row.value(key_column)))
                .or_default()
                .push(row);
        }
        Self { groups }
    }

    /// Rows for `key`; empty when the subject is not in the dataset.
    pub fn rows(&self, key: &str) -> &[&'a Record] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[&'a Record])> {
        self.groups
            .iter()
            .map(|(key, rows)| (key.as_str(), rows.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// One row of an outer join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord<'a> {
    pub key: String,
    pub provenance: Provenance,
    pub left: Option<&'a Record>,
    pub right: Option<&'a Record>,
}

/// Result of joining two datasets on the subject key.
#[derive(Debug, Clone)]
pub struct JoinedDataset<'a> {
    left: &'a Dataset,
    right: &'a Dataset,
    records: Vec<JoinedRecord<'a>>,
    suffixes: JoinSuffixes,
}

impl<'a> JoinedDataset<'a> {
    pub fn records(&self) -> &[JoinedRecord<'a>] {
        &self.records
    }

    /// Records present on both sides.
    pub fn matched(&self) -> impl Iterator<Item = &JoinedRecord<'a>> {
        self.records
            .iter()
            .filter(|record| record.provenance == Provenance::Both)
    }

    /// Every subject key in the join: the union of both inputs' keys.
    pub fn subject_keys(&self) -> BTreeSet<&str> {
        self.records.iter().map(|record| record.key.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Output column name for a left-side column, suffixed when the name
    /// also exists on the right.
    pub fn left_column_name(&self, column: &str) -> String {
        if self.right.has_column(column) {
            format!("{column}{}", self.suffixes.left)
        } else {
            column.to_string()
        }
    }

    /// Output column name for a right-side column, suffixed when the name
    /// also exists on the left.
    pub fn right_column_name(&self, column: &str) -> String {
        if self.left.has_column(column) {
            format!("{column}{}", self.suffixes.right)
        } else {
            column.to_string()
        }
    }

    /// Materialize the join as a flat dataset: `KEY`, left columns, right columns.
    pub fn flatten(&self) -> Dataset {
        let mut columns = vec![KEY_COLUMN.to_string()];
        columns.extend(self.left.columns().iter().map(|c| self.left_column_name(c)));
        columns.extend(self.right.columns().iter().map(|c| self.right_column_name(c)));

        let rows = self
            .records
            .iter()
            .map(|joined| {
                let mut record = Record::new().with(KEY_COLUMN, joined.key.as_str());
                for column in self.left.columns() {
                    let value = joined
                        .left
                        .map(|row| row.value(column).clone())
                        .unwrap_or(CellValue::Missing);
                    record.insert(self.left_column_name(column), value);
                }
                for column in self.right.columns() {
                    let value = joined
                        .right
                        .map(|row| row.value(column).clone())
                        .unwrap_or(CellValue::Missing);
                    record.insert(self.right_column_name(column), value);
                }
                record
            })
            .collect();

        Dataset::new(
            format!("{}+{}", self.left.name(), self.right.name()),
            columns,
            rows,
        )
    }
}

/// Outer join on normalized subject keys.
pub struct DatasetJoiner {
    suffixes: JoinSuffixes,
}

impl Default for DatasetJoiner {
    fn default() -> Self {
        Self::new(JoinSuffixes::default())
    }
}

impl DatasetJoiner {
    pub fn new(suffixes: JoinSuffixes) -> Self {
        Self { suffixes }
    }

    /// Join `left` and `right` on their resolved subject columns.
    ///
    /// Records are ordered by subject key; within a key, left rows vary slowest.
    pub fn outer_join<'a>(
        &self,
        left: &'a Dataset,
        left_key: &str,
        right: &'a Dataset,
        right_key: &str,
    ) -> JoinedDataset<'a> {
        let left_index = SubjectIndex::build(left, left_key);
        let right_index = SubjectIndex::build(right, right_key);
        let keys: BTreeSet<&str> = left_index.keys().chain(right_index.keys()).collect();

        let mut records = Vec::new();
        for key in keys {
            let lefts = left_index.rows(key);
            let rights = right_index.rows(key);
            match (lefts.is_empty(), rights.is_empty()) {
                (false, false) => {
                    for l in lefts {
                        for r in rights {
                            records.push(JoinedRecord {
                                key: key.to_string(),
                                provenance: Provenance::Both,
                                left: Some(*l),
                                right: Some(*r),
                            });
                        }
                    }
                }
                (false, true) => records.extend(lefts.iter().map(|l| JoinedRecord {
                    key: key.to_string(),
                    provenance: Provenance::LeftOnly,
                    left: Some(*l),
                    right: None,
                })),
                (true, false) => records.extend(rights.iter().map(|r| JoinedRecord {
                    key: key.to_string(),
                    provenance: Provenance::RightOnly,
                    left: None,
                    right: Some(*r),
                })),
                (true, true) => {}
            }
        }

        tracing::debug!(
            left_rows = left.len(),
            right_rows = right.len(),
            joined = records.len(),
            "outer join complete"
        );

        JoinedDataset {
            left,
            right,
            records,
            suffixes: self.suffixes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edc() -> Dataset {
        Dataset::from_text_rows(
            "EDC",
            ["USUBJID", "AEREL"],
            [vec!["001", "RELATED"], vec![" 002", "NONE"]],
        )
    }

    fn safety() -> Dataset {
        Dataset::from_text_rows(
            "SAFETY",
            ["Subject", "AEREL"],
            [vec!["002 ", "UNLIKELY"], vec!["003", "POSSIBLE"]],
        )
    }

    #[test]
    fn keeps_unmatched_rows_from_both_sides() {
        let (left, right) = (edc(), safety());
        let joined = DatasetJoiner::default().outer_join(&left, "USUBJID", &right, "Subject");
        let provenance: Vec<_> = joined
            .records()
            .iter()
            .map(|r| (r.key.as_str(), r.provenance))
            .collect();
        assert_eq!(
            provenance,
            vec![
                ("001", Provenance::LeftOnly),
                ("002", Provenance::Both),
                ("003", Provenance::RightOnly),
            ]
        );
    }

    #[test]
    fn shared_column_names_get_suffixes() {
        let (left, right) = (edc(), safety());
        let joined = DatasetJoiner::default().outer_join(&left, "USUBJID", &right, "Subject");
        let flat = joined.flatten();
        assert_eq!(
            flat.columns(),
            &["KEY", "USUBJID", "AEREL_EDC", "Subject", "AEREL_EXT"]
        );
        let row = &flat.rows()[1];
        assert_eq!(row.value("AEREL_EDC").as_text(), "NONE");
        assert_eq!(row.value("AEREL_EXT").as_text(), "UNLIKELY");
    }

    #[test]
    fn duplicate_keys_pair_every_row() {
        let left = Dataset::from_text_rows("AE", ["USUBJID", "AETERM"], [vec!["1", "A"], vec!["1", "B"]]);
        let right = Dataset::from_text_rows("CM", ["USUBJID", "CMINDC"], [vec!["1", "X"], vec!["1", "Y"]]);
        let joined = DatasetJoiner::default().outer_join(&left, "USUBJID", &right, "USUBJID");
        assert_eq!(joined.len(), 4);
        assert_eq!(joined.matched().count(), 4);
    }
}
