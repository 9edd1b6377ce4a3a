//! Chronic medications: every ConMed indication should appear in medical history.

use recon_model::PillarKey;
use recon_transform::Role;

use super::{Pillar, contains_any, indication_explained};
use crate::context::PillarContext;
use crate::finding::Finding;

pub const MISSING_HISTORY: &str = "Missing History";

const EXCLUDED_INDICATIONS: &[&str] = &["PROPHYLAXIS", "PREVENTION"];

pub struct MhConMedPillar;

impl Pillar for MhConMedPillar {
    fn key(&self) -> PillarKey {
        PillarKey::MhConMed
    }

    fn label(&self) -> &'static str {
        "Medical history vs ConMed"
    }

    fn primary_label(&self) -> &'static str {
        "Concomitant medications"
    }

    fn secondary_label(&self) -> Option<&'static str> {
        Some("Medical history")
    }

    fn primary_roles(&self) -> &'static [Role] {
        &[Role::Indication]
    }

    fn secondary_roles(&self) -> &'static [Role] {
        &[Role::HistoryTerm]
    }

    /// Only subjects with medications are checked.
    fn evaluate(&self, ctx: &PillarContext<'_>) -> Vec<Finding> {
        let Some(history) = ctx.secondary() else {
            return Vec::new();
        };
        let conmed = ctx.primary();
        let cm_index = conmed.index();
        let mh_index = history.index();

        let mut findings = Vec::new();
        for (subject, rows) in cm_index.iter() {
            let terms: Vec<String> = mh_index
                .rows(subject)
                .iter()
                .map(|row| history.value(row, Role::HistoryTerm).upper())
                .collect();
            for row in rows {
                let indication = conmed.value(row, Role::Indication).upper();
                if indication.is_empty() || contains_any(&indication, EXCLUDED_INDICATIONS) {
                    continue;
                }
                if !indication_explained(&indication, terms.iter().map(String::as_str)) {
                    findings.push(Finding::new(subject, MISSING_HISTORY).with_detail(format!(
                        "Med for '{indication}' exists, but not in Medical History."
                    )));
                }
            }
        }
        findings
    }
}
