//! Coding homogeneity: one verbatim term should map to one code.

use std::collections::BTreeMap;

use recon_model::PillarKey;
use recon_transform::Role;

use super::Pillar;
use crate::context::PillarContext;
use crate::finding::Finding;

pub const SPLIT_CODING: &str = "Split Coding";

/// Subject reported for term-level findings.
pub const MULTIPLE_SUBJECTS: &str = "Multiple";

/// Literal null markers left behind by upstream exports.
const NULL_MARKERS: [&str; 2] = ["nan", "None"];

pub struct CodingPillar;

impl Pillar for CodingPillar {
    fn key(&self) -> PillarKey {
        PillarKey::Coding
    }

    fn label(&self) -> &'static str {
        "Coding consistency"
    }

    fn primary_label(&self) -> &'static str {
        "Coded adverse events"
    }

    fn primary_roles(&self) -> &'static [Role] {
        &[Role::Term, Role::Code]
    }

    fn evaluate(&self, ctx: &PillarContext<'_>) -> Vec<Finding> {
        let view = ctx.primary();

        // Distinct codes per verbatim term, in order of first appearance.
        let mut codes_by_term: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for row in view.rows() {
            let term = view.value(row, Role::Term);
            if term.is_missing() {
                continue;
            }
            let codes = codes_by_term.entry(term.as_text().trim().to_string()).or_default();
            let code = view.value(row, Role::Code);
            if code.is_missing() {
                continue;
            }
            let code = code.as_text().trim().to_string();
            if !NULL_MARKERS.contains(&code.as_str()) && !codes.contains(&code) {
                codes.push(code);
            }
        }

        codes_by_term
            .into_iter()
            .filter(|(_, codes)| codes.len() > 1)
            .map(|(term, codes)| {
                let listed = codes
                    .iter()
                    .map(|code| format!("'{code}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                Finding::new(MULTIPLE_SUBJECTS, SPLIT_CODING)
                    .with_detail(format!("'{term}' coded as [{listed}]"))
            })
            .collect()
    }
}
