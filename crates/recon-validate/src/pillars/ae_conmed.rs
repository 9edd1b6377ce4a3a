//! Orphan medications: every ConMed indication should match an adverse event.

use std::collections::BTreeSet;

use recon_model::PillarKey;
use recon_transform::Role;

use super::{Pillar, contains_any, indication_explained};
use crate::context::PillarContext;
use crate::finding::Finding;

pub const ORPHAN_CONMED: &str = "Orphan ConMed";

/// Indications that need no matching event.
const EXCLUDED_INDICATIONS: &[&str] = &["PROPHYLAXIS", "PREVENTION", "SUPPLEMENT"];

pub struct AeConMedPillar;

impl Pillar for AeConMedPillar {
    fn key(&self) -> PillarKey {
        PillarKey::AeConMed
    }

    fn label(&self) -> &'static str {
        "AE vs ConMed"
    }

    fn primary_label(&self) -> &'static str {
        "Adverse events"
    }

    fn secondary_label(&self) -> Option<&'static str> {
        Some("Concomitant medications")
    }

    fn primary_roles(&self) -> &'static [Role] {
        &[Role::Term]
    }

    fn secondary_roles(&self) -> &'static [Role] {
        &[Role::Indication]
    }

    fn evaluate(&self, ctx: &PillarContext<'_>) -> Vec<Finding> {
        let Some(conmed) = ctx.secondary() else {
            return Vec::new();
        };
        let ae = ctx.primary();
        let ae_index = ae.index();
        let cm_index = conmed.index();
        let subjects: BTreeSet<&str> = ae_index.keys().chain(cm_index.keys()).collect();

        let mut findings = Vec::new();
        for subject in subjects {
            let terms: Vec<String> = ae_index
                .rows(subject)
                .iter()
                .map(|row| ae.value(row, Role::Term).upper())
                .collect();
            for row in cm_index.rows(subject) {
                let indication = conmed.value(row, Role::Indication).upper();
                if indication.is_empty() || contains_any(&indication, EXCLUDED_INDICATIONS) {
                    continue;
                }
                if !indication_explained(&indication, terms.iter().map(String::as_str)) {
                    findings.push(
                        Finding::new(subject, ORPHAN_CONMED)
                            .with_detail(format!("Indication '{indication}' has no matching AE.")),
                    );
                }
            }
        }
        findings
    }
}
