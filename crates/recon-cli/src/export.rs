//! CSV and JSON export of result tables.

use std::io::Write;

use anyhow::{Context, Result};
use recon_model::{GroupLevel, IssueTable, ReconOutcome, RiskTable, format_numeric};
use serde::Serialize;

/// Write an issue table with the same columns it renders with.
pub fn write_issues_csv<W: Write>(writer: W, table: &IssueTable) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table.headers())?;
    for row in table.rows() {
        csv.write_record(&row)?;
    }
    csv.flush().context("flush CSV output")?;
    Ok(())
}

/// Write a risk table: group, aggregate columns, then score columns.
pub fn write_risk_csv<W: Write>(writer: W, table: &RiskTable, level: GroupLevel) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    match table {
        RiskTable::Error(message) => {
            csv.write_record(["Error"])?;
            csv.write_record([message])?;
        }
        RiskTable::Records(records) => {
            let aggregate_columns: Vec<&str> = records
                .first()
                .map(|record| record.aggregates.iter().map(|(name, _)| name.as_str()).collect())
                .unwrap_or_default();

            let mut header = vec![level.as_str()];
            header.extend(&aggregate_columns);
            header.extend(["Risk Score", "Risk Metric", "Risk Status"]);
            csv.write_record(&header)?;

            for record in records {
                let mut row = vec![record.group.clone()];
                row.extend(record.aggregates.iter().map(|(_, value)| format_numeric(*value)));
                row.push(format_numeric(record.normalized_score));
                row.push(record.metric.label().to_string());
                row.push(record.band.label().to_string());
                csv.write_record(&row)?;
            }
        }
    }
    csv.flush().context("flush CSV output")?;
    Ok(())
}

/// Pretty-printed JSON of any result value.
pub fn write_json<W: Write, T: Serialize>(writer: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(writer, value).context("serialize JSON output")
}

/// Reconciliation output as JSON: discrepancies, metrics, and breakdown.
pub fn write_outcome_json<W: Write>(writer: W, outcome: &ReconOutcome) -> Result<()> {
    write_json(writer, outcome)
}
