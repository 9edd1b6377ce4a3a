//! Protocol deviation reconciliation: PD log against EDC visits.

use recon_model::PillarKey;
use recon_transform::Role;

use super::{Pillar, contains_any, names_overlap};
use crate::context::PillarContext;
use crate::finding::Finding;

pub const ZOMBIE_VISIT: &str = "Zombie Visit";
pub const UNREPORTED_DEVIATION: &str = "Unreported Deviation";

/// Window statuses of a visit outside its protocol window.
const OUT_OF_WINDOW: &[&str] = &["OUT", "FAIL", "DEV"];

pub struct PdReconPillar;

impl Pillar for PdReconPillar {
    fn key(&self) -> PillarKey {
        PillarKey::PdRecon
    }

    fn label(&self) -> &'static str {
        "Protocol deviation reconciliation"
    }

    fn primary_label(&self) -> &'static str {
        "PD log"
    }

    fn secondary_label(&self) -> Option<&'static str> {
        Some("EDC visits")
    }

    fn primary_roles(&self) -> &'static [Role] {
        &[Role::DeviationCategory, Role::DeviationVisit]
    }

    fn secondary_roles(&self) -> &'static [Role] {
        &[Role::EdcVisit, Role::VisitDate, Role::VisitWindow]
    }

    fn evaluate(&self, ctx: &PillarContext<'_>) -> Vec<Finding> {
        let Some(edc) = ctx.secondary() else {
            return Vec::new();
        };
        let deviations = ctx.primary();
        let edc_index = edc.index();
        let pd_index = deviations.index();

        let mut findings = Vec::new();

        // PD says the visit was missed, EDC holds a date for it.
        for record in deviations.rows() {
            if !deviations
                .value(record, Role::DeviationCategory)
                .upper()
                .contains("MISS")
            {
                continue;
            }
            let subject = deviations.subject(record);
            let visit = deviations.value(record, Role::DeviationVisit).upper();
            for edc_row in edc_index.rows(&subject) {
                let edc_visit = edc.value(edc_row, Role::EdcVisit).upper();
                let date = edc.value(edc_row, Role::VisitDate);
                if names_overlap(&visit, &edc_visit) && !date.is_missing() {
                    findings.push(
                        Finding::new(&subject, ZOMBIE_VISIT)
                            .with_detail(format!(
                                "PD Log says '{visit}' Missed, but EDC has Date {}.",
                                date.as_text()
                            ))
                            .with_action("Verify Data Accuracy"),
                    );
                }
            }
        }

        // EDC visit out of window with no deviation logged.
        if edc.is_matched(Role::VisitWindow) {
            for record in edc.rows() {
                let window = edc.value(record, Role::VisitWindow).upper();
                if !contains_any(&window, OUT_OF_WINDOW) {
                    continue;
                }
                let subject = edc.subject(record);
                let visit = edc.value(record, Role::EdcVisit).upper();
                let reported = pd_index.rows(&subject).iter().any(|row| {
                    names_overlap(&visit, &deviations.value(row, Role::DeviationVisit).upper())
                });
                if !reported {
                    findings.push(
                        Finding::new(&subject, UNREPORTED_DEVIATION)
                            .with_detail(format!("Visit '{visit}' OOW in EDC, missing in PD Log."))
                            .with_action("Site to Report PD"),
                    );
                }
            }
        }

        findings
    }
}
