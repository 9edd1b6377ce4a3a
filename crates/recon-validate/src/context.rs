//! Resolved inputs handed to a pillar.

use recon_model::{CellValue, Dataset, PillarKey, ReconError, ReconOptions, Record, normalize_subject};
use recon_transform::{DateNormalizer, DatasetJoiner, JoinedDataset, Role, RoleMap, SubjectIndex};

use crate::finding::RowError;

/// A dataset with its column roles resolved.
#[derive(Debug, Clone)]
pub struct DatasetView<'a> {
    dataset: &'a Dataset,
    roles: RoleMap,
    subject_column: String,
}

impl<'a> DatasetView<'a> {
    /// Resolve `roles` (plus the subject identifier) against `dataset`.
    ///
    /// Fails only when no subject column can be chosen, i.e. the dataset has
    /// no columns at all.
    pub fn resolve(dataset: &'a Dataset, roles: &[Role]) -> Result<Self, ReconError> {
        let mut requested = Vec::with_capacity(roles.len() + 1);
        requested.push(Role::SubjectId);
        requested.extend(roles.iter().copied().filter(|role| *role != Role::SubjectId));

        let roles = RoleMap::resolve(dataset.columns(), &requested);
        let subject_column = roles
            .column(Role::SubjectId)
            .ok_or_else(|| ReconError::Schema {
                dataset: dataset.name().to_string(),
                role: Role::SubjectId.name().to_string(),
            })?
            .to_string();

        Ok(Self {
            dataset,
            roles,
            subject_column,
        })
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn rows(&self) -> &'a [Record] {
        self.dataset.rows()
    }

    pub fn roles(&self) -> &RoleMap {
        &self.roles
    }

    pub fn subject_column(&self) -> &str {
        &self.subject_column
    }

    /// Normalized subject key of a row.
    pub fn subject(&self, record: &Record) -> String {
        normalize_subject(record.value(&self.subject_column))
    }

    pub fn value<'r>(&self, record: &'r Record, role: Role) -> &'r CellValue {
        self.roles.value(record, role)
    }

    pub fn is_matched(&self, role: Role) -> bool {
        self.roles.is_matched(role)
    }

    /// Rows grouped by normalized subject key.
    pub fn index(&self) -> SubjectIndex<'a> {
        SubjectIndex::build(self.dataset, &self.subject_column)
    }
}

/// Everything a pillar evaluation may read.
#[derive(Debug, Clone)]
pub struct PillarContext<'a> {
    pillar: PillarKey,
    primary: DatasetView<'a>,
    secondary: Option<DatasetView<'a>>,
    options: &'a ReconOptions,
    dates: DateNormalizer,
}

impl<'a> PillarContext<'a> {
    pub fn new(
        pillar: PillarKey,
        primary: DatasetView<'a>,
        secondary: Option<DatasetView<'a>>,
        options: &'a ReconOptions,
    ) -> Self {
        Self {
            pillar,
            primary,
            secondary,
            options,
            dates: DateNormalizer::default(),
        }
    }

    pub fn pillar(&self) -> PillarKey {
        self.pillar
    }

    pub fn primary(&self) -> &DatasetView<'a> {
        &self.primary
    }

    pub fn secondary(&self) -> Option<&DatasetView<'a>> {
        self.secondary.as_ref()
    }

    pub fn options(&self) -> &ReconOptions {
        self.options
    }

    pub fn dates(&self) -> &DateNormalizer {
        &self.dates
    }

    /// Outer join of the primary and secondary datasets on their subject columns.
    pub fn join(&self) -> Option<JoinedDataset<'a>> {
        let secondary = self.secondary.as_ref()?;
        let joiner = DatasetJoiner::new(self.options.join_suffixes.clone());
        Some(joiner.outer_join(
            self.primary.dataset,
            &self.primary.subject_column,
            secondary.dataset,
            &secondary.subject_column,
        ))
    }

    /// Record that a row was skipped for one check.
    pub fn skip_row(&self, err: &RowError) {
        tracing::debug!(pillar = %self.pillar, error = %err, "row skipped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_always_resolves_subject_column() {
        let ds = Dataset::from_text_rows("AE", ["Site", "AETERM"], [vec!["01", "Headache"]]);
        let view = DatasetView::resolve(&ds, &[Role::Term]).unwrap();
        assert_eq!(view.subject_column(), "Site");
        assert!(view.is_matched(Role::Term));
    }

    #[test]
    fn view_without_columns_is_a_schema_error() {
        let ds = Dataset::new("EMPTY", Vec::new(), Vec::new());
        let err = DatasetView::resolve(&ds, &[]).unwrap_err();
        assert!(matches!(err, ReconError::Schema { .. }));
    }
}
