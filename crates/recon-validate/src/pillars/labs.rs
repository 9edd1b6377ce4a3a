//! Lab reconciliation: EDC visits against external lab results.

use recon_model::PillarKey;
use recon_transform::{Parsed, Role};

use super::{Pillar, contains_any};
use crate::context::PillarContext;
use crate::finding::{Finding, RowError};

pub const SAMPLE_ISSUE: &str = "Sample Issue";
pub const DATE_MISMATCH: &str = "Date Mismatch";

/// Comment markers of a rejected sample: quantity not sufficient, hemolyzed.
const REJECTION_MARKERS: &[&str] = &["QNS", "HEMOL"];

pub struct LabsPillar;

impl Pillar for LabsPillar {
    fn key(&self) -> PillarKey {
        PillarKey::Labs
    }

    fn label(&self) -> &'static str {
        "Lab reconciliation"
    }

    fn primary_label(&self) -> &'static str {
        "EDC visits"
    }

    fn secondary_label(&self) -> Option<&'static str> {
        Some("External lab results")
    }

    fn primary_roles(&self) -> &'static [Role] {
        &[Role::VisitDate]
    }

    fn secondary_roles(&self) -> &'static [Role] {
        &[Role::LabDate, Role::LabComment, Role::ResultValue]
    }

    fn evaluate(&self, ctx: &PillarContext<'_>) -> Vec<Finding> {
        let (Some(lab), Some(joined)) = (ctx.secondary(), ctx.join()) else {
            return Vec::new();
        };
        let edc = ctx.primary();
        let window = ctx.options().lab_date_window_days;
        let has_comment = lab.roles().column(Role::LabComment).is_some();

        let mut findings = Vec::new();
        for (row, record) in joined.matched().enumerate() {
            let (Some(visit), Some(result)) = (record.left, record.right) else {
                continue;
            };

            if has_comment && lab.value(result, Role::ResultValue).is_missing() {
                let comment = lab.value(result, Role::LabComment);
                if contains_any(&comment.upper(), REJECTION_MARKERS) {
                    findings.push(
                        Finding::new(&record.key, SAMPLE_ISSUE)
                            .with_detail(format!("Lab Rejected: {}", comment.as_text())),
                    );
                }
            }

            let visit_date = ctx.dates().normalize(edc.value(visit, Role::VisitDate));
            let lab_date = ctx.dates().normalize(lab.value(result, Role::LabDate));
            match (visit_date, lab_date) {
                (Parsed::Value(visit_date), Parsed::Value(lab_date)) => {
                    let days = (lab_date - visit_date).num_days();
                    if days.abs() > window {
                        findings.push(
                            Finding::new(&record.key, DATE_MISMATCH)
                                .with_detail(format!("Lab drawn {days} days from visit.")),
                        );
                    }
                }
                (Parsed::Malformed(_), _) => ctx.skip_row(&RowError::NotDate {
                    row,
                    role: Role::VisitDate,
                }),
                (_, Parsed::Malformed(_)) => ctx.skip_row(&RowError::NotDate {
                    row,
                    role: Role::LabDate,
                }),
                _ => {}
            }
        }
        findings
    }
}
