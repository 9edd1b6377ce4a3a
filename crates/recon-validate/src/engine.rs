//! Reconciliation entry point.

use recon_model::{Dataset, PillarKey, ReconError, ReconOptions, ReconOutcome, Result};
use tracing::{info, info_span, warn};

use crate::context::{DatasetView, PillarContext};
use crate::formatter::format_output;
use crate::registry::PillarRegistry;

/// Runs pillars from a registry with one set of options.
pub struct ReconEngine {
    registry: PillarRegistry,
    options: ReconOptions,
}

impl Default for ReconEngine {
    fn default() -> Self {
        Self::new(ReconOptions::default())
    }
}

impl ReconEngine {
    pub fn new(options: ReconOptions) -> Self {
        Self::with_registry(PillarRegistry::standard(), options)
    }

    pub fn with_registry(registry: PillarRegistry, options: ReconOptions) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &PillarRegistry {
        &self.registry
    }

    pub fn options(&self) -> &ReconOptions {
        &self.options
    }

    /// Reconcile `primary` (and `secondary`, for two-dataset pillars) under `mode`.
    ///
    /// Never fails: setup errors come back as a one-row error table with
    /// metrics over the primary dataset.
    pub fn run(&self, primary: &Dataset, secondary: Option<&Dataset>, mode: &str) -> ReconOutcome {
        match self.try_run(primary, secondary, mode) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(mode, error = %err, "reconciliation aborted");
                ReconOutcome::error(PillarKey::parse(mode), err.to_string(), primary.len())
            }
        }
    }

    fn try_run(
        &self,
        primary: &Dataset,
        secondary: Option<&Dataset>,
        mode: &str,
    ) -> Result<ReconOutcome> {
        let key: PillarKey = mode.parse()?;
        let pillar = self
            .registry
            .get(key)
            .ok_or_else(|| ReconError::UnknownMode(mode.to_string()))?;

        let span = info_span!(
            "pillar",
            pillar = %key,
            primary_rows = primary.len(),
            secondary_rows = secondary.map_or(0, Dataset::len)
        );
        let _guard = span.enter();

        let primary_view = DatasetView::resolve(primary, pillar.primary_roles())?;
        let secondary_view = if pillar.needs_secondary() {
            let dataset = secondary.ok_or_else(|| ReconError::MissingDataset {
                pillar: key.to_string(),
            })?;
            Some(DatasetView::resolve(dataset, pillar.secondary_roles())?)
        } else {
            None
        };

        let ctx = PillarContext::new(key, primary_view, secondary_view, &self.options);
        let findings = pillar.evaluate(&ctx);
        info!(findings = findings.len(), "pillar evaluated");

        Ok(format_output(key, findings, primary.len()))
    }
}

/// Reconcile with the standard registry.
pub fn run_recon(
    primary: &Dataset,
    secondary: Option<&Dataset>,
    mode: &str,
    options: &ReconOptions,
) -> ReconOutcome {
    ReconEngine::new(options.clone()).run(primary, secondary, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon_model::IssueTable;

    #[test]
    fn unknown_mode_is_an_error_table() {
        let ds = Dataset::from_text_rows("AE", ["USUBJID"], [vec!["001"]]);
        let outcome = run_recon(&ds, None, "Vitals", &ReconOptions::default());
        assert_eq!(
            outcome.table,
            IssueTable::Error("unknown reconciliation mode 'Vitals'".to_string())
        );
        assert_eq!(outcome.pillar, None);
        assert_eq!(outcome.metrics.total, 1);
    }

    #[test]
    fn two_dataset_pillar_without_secondary_is_an_error_table() {
        let ds = Dataset::from_text_rows("AE", ["USUBJID"], [vec!["001"]]);
        let outcome = run_recon(&ds, None, "SAE", &ReconOptions::default());
        assert!(outcome.table.is_error());
        assert_eq!(outcome.pillar, Some(PillarKey::Sae));
    }

    #[test]
    fn mode_keys_are_case_insensitive() {
        let ds = Dataset::from_text_rows("AE", ["USUBJID", "AETERM", "AELLT"], [vec!["001", "Headache", "10019211"]]);
        let outcome = run_recon(&ds, None, "coding", &ReconOptions::default());
        assert_eq!(outcome.table, IssueTable::NoIssues);
    }
}
