//! Death reconciliation: fatal adverse events against disposition.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use recon_model::PillarKey;
use recon_transform::Role;
use regex::Regex;

use super::Pillar;
use crate::context::PillarContext;
use crate::finding::Finding;

pub const GHOST_RECORD: &str = "Ghost Record";
pub const ZOMBIE_RECORD: &str = "Zombie Record";

static FATAL_OUTCOME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("(?i)FATAL|DEATH").expect("Invalid fatal outcome regex"));

pub struct DeathPillar;

impl Pillar for DeathPillar {
    fn key(&self) -> PillarKey {
        PillarKey::Death
    }

    fn label(&self) -> &'static str {
        "Death reconciliation"
    }

    fn primary_label(&self) -> &'static str {
        "Adverse events"
    }

    fn secondary_label(&self) -> Option<&'static str> {
        Some("Disposition")
    }

    fn primary_roles(&self) -> &'static [Role] {
        &[Role::Outcome]
    }

    fn secondary_roles(&self) -> &'static [Role] {
        &[Role::DispositionReason]
    }

    /// Evaluated once per subject in either dataset.
    fn evaluate(&self, ctx: &PillarContext<'_>) -> Vec<Finding> {
        let Some(dispo) = ctx.secondary() else {
            return Vec::new();
        };
        let ae = ctx.primary();
        let ae_index = ae.index();
        let dispo_index = dispo.index();

        let fatal: BTreeSet<&str> = ae_index
            .iter()
            .filter(|(_, rows)| {
                rows.iter()
                    .any(|row| FATAL_OUTCOME.is_match(&ae.value(row, Role::Outcome).as_text()))
            })
            .map(|(key, _)| key)
            .collect();

        let subjects: BTreeSet<&str> = ae_index.keys().chain(dispo_index.keys()).collect();

        let mut findings = Vec::new();
        for subject in subjects {
            let dead_in_dispo = dispo_index
                .rows(subject)
                .iter()
                .any(|row| dispo.value(row, Role::DispositionReason).upper().contains("DEATH"));
            let fatal_ae = fatal.contains(subject);

            if dead_in_dispo && !fatal_ae {
                findings.push(
                    Finding::new(subject, GHOST_RECORD).with_detail("Dispo says Death, No Fatal AE."),
                );
            }
            if fatal_ae && !dead_in_dispo {
                findings.push(
                    Finding::new(subject, ZOMBIE_RECORD)
                        .with_detail("Fatal AE exists, Subject Active in Dispo."),
                );
            }
        }
        findings
    }
}
