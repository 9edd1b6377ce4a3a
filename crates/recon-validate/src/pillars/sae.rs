//! SAE reconciliation: EDC adverse events against the safety database.

use recon_model::{CellValue, PillarKey};
use recon_transform::Role;

use super::Pillar;
use crate::context::PillarContext;
use crate::finding::Finding;

pub const SERIOUSNESS_MISMATCH: &str = "Seriousness Mismatch";
pub const CAUSALITY_CONFLICT: &str = "Causality Conflict";

const SERIOUS_VALUES: [&str; 4] = ["Y", "YES", "TRUE", "SERIOUS"];

/// Causality terms agree when their first characters agree.
const CAUSALITY_PREFIX_LEN: usize = 3;

const ROLES: &[Role] = &[Role::Seriousness, Role::Causality];

pub struct SaePillar;

impl Pillar for SaePillar {
    fn key(&self) -> PillarKey {
        PillarKey::Sae
    }

    fn label(&self) -> &'static str {
        "SAE reconciliation"
    }

    fn primary_label(&self) -> &'static str {
        "EDC adverse events"
    }

    fn secondary_label(&self) -> Option<&'static str> {
        Some("Safety database")
    }

    fn primary_roles(&self) -> &'static [Role] {
        ROLES
    }

    fn secondary_roles(&self) -> &'static [Role] {
        ROLES
    }

    fn evaluate(&self, ctx: &PillarContext<'_>) -> Vec<Finding> {
        let (Some(safety), Some(joined)) = (ctx.secondary(), ctx.join()) else {
            return Vec::new();
        };
        let edc = ctx.primary();

        // The safety side owns seriousness when it carries the flag.
        let seriousness_on_safety = safety.is_matched(Role::Seriousness);
        let compare_causality = edc.is_matched(Role::Causality) && safety.is_matched(Role::Causality);

        let mut findings = Vec::new();
        for record in joined.matched() {
            let (Some(edc_row), Some(safety_row)) = (record.left, record.right) else {
                continue;
            };

            let seriousness = if seriousness_on_safety {
                safety.value(safety_row, Role::Seriousness)
            } else {
                edc.value(edc_row, Role::Seriousness)
            };
            if !is_serious(seriousness) {
                findings.push(
                    Finding::new(&record.key, SERIOUSNESS_MISMATCH)
                        .with_detail("Safe DB has event, EDC not Serious."),
                );
            }

            if compare_causality
                && causality_prefix(edc.value(edc_row, Role::Causality))
                    != causality_prefix(safety.value(safety_row, Role::Causality))
            {
                findings.push(
                    Finding::new(&record.key, CAUSALITY_CONFLICT)
                        .with_detail("Investigator vs Sponsor mismatch."),
                );
            }
        }
        findings
    }
}

fn is_serious(value: &CellValue) -> bool {
    SERIOUS_VALUES.contains(&value.upper().as_str())
}

fn causality_prefix(value: &CellValue) -> String {
    value.upper().chars().take(CAUSALITY_PREFIX_LEN).collect()
}
