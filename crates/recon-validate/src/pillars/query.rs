//! Query log review: aging, ping-pong, lazy answers, and form hotspots.

use recon_model::{PillarKey, format_numeric};
use recon_transform::{Parsed, Role, parse_number};

use super::{Pillar, contains_any};
use crate::context::PillarContext;
use crate::finding::{Finding, RowError};

pub const AGING_QUERY: &str = "Aging Query";
pub const PING_PONG_QUERY: &str = "Ping-Pong Query";
pub const LAZY_ANSWER: &str = "Lazy Answer";
pub const FORM_HOTSPOT: &str = "Form Hotspot";

/// Subject reported for study-level findings.
pub const ALL_SUBJECTS: &str = "ALL";

const UNKNOWN_FORM: &str = "Unknown";
const LAZY_RESPONSES: &[&str] = &["WILL UPDATE", "LATER", "NOTED"];

pub struct QueryReconPillar;

impl Pillar for QueryReconPillar {
    fn key(&self) -> PillarKey {
        PillarKey::QueryRecon
    }

    fn label(&self) -> &'static str {
        "Query reconciliation"
    }

    fn primary_label(&self) -> &'static str {
        "Query log"
    }

    fn primary_roles(&self) -> &'static [Role] {
        &[
            Role::QueryStatus,
            Role::QueryAge,
            Role::QueryResponse,
            Role::RevisionCount,
            Role::FormName,
        ]
    }

    fn evaluate(&self, ctx: &PillarContext<'_>) -> Vec<Finding> {
        let view = ctx.primary();
        let options = ctx.options();
        let has_revisions = view.roles().column(Role::RevisionCount).is_some();

        let mut findings = Vec::new();
        let mut form_counts: Vec<(String, usize)> = Vec::new();

        for (row, record) in view.rows().iter().enumerate() {
            let subject = view.subject(record);
            let status = view.value(record, Role::QueryStatus).upper();

            let form = view.value(record, Role::FormName);
            let form = if form.is_missing() {
                UNKNOWN_FORM.to_string()
            } else {
                form.as_text().into_owned()
            };
            match form_counts.iter_mut().find(|(name, _)| *name == form) {
                Some((_, count)) => *count += 1,
                None => form_counts.push((form, 1)),
            }

            match parse_number(view.value(record, Role::QueryAge)) {
                Parsed::Value(age) if status.contains("OPEN") && age > options.aging_query_days => {
                    findings.push(
                        Finding::new(&subject, AGING_QUERY)
                            .with_detail(format!("Open {} days", format_numeric(age)))
                            .with_action("Escalate"),
                    );
                }
                Parsed::Malformed(_) => ctx.skip_row(&RowError::NotNumeric {
                    row,
                    role: Role::QueryAge,
                }),
                _ => {}
            }

            let revised_often = if has_revisions {
                match parse_number(view.value(record, Role::RevisionCount)) {
                    Parsed::Value(revisions) => revisions > options.ping_pong_revisions,
                    Parsed::Malformed(_) => {
                        ctx.skip_row(&RowError::NotNumeric {
                            row,
                            role: Role::RevisionCount,
                        });
                        false
                    }
                    Parsed::Absent => false,
                }
            } else {
                false
            };
            if status.contains("RE-OPEN") || revised_often {
                findings.push(
                    Finding::new(&subject, PING_PONG_QUERY)
                        .with_detail("Re-opened multiple times")
                        .with_action("Call Site"),
                );
            }

            let response = view.value(record, Role::QueryResponse).upper();
            if status.contains("ANSWER") && contains_any(&response, LAZY_RESPONSES) {
                findings.push(
                    Finding::new(&subject, LAZY_ANSWER)
                        .with_detail(format!("Response: '{response}'"))
                        .with_action("Reject"),
                );
            }
        }

        let total = view.rows().len();
        if total > 0 {
            let share = format_numeric(options.form_hotspot_share * 100.0);
            for (form, count) in form_counts {
                if count as f64 / total as f64 > options.form_hotspot_share {
                    findings.push(
                        Finding::new(ALL_SUBJECTS, FORM_HOTSPOT)
                            .with_detail(format!("'{form}' has >{share}% of queries"))
                            .with_action("Review Design"),
                    );
                }
            }
        }

        findings
    }
}
