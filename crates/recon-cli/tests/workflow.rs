//! File-to-file workflows: CSV extracts in, exported tables out.

use std::fs;
use std::path::{Path, PathBuf};

use recon_cli::config::ReconConfig;
use recon_cli::export::{write_issues_csv, write_outcome_json, write_risk_csv};
use recon_ingest::read_csv_dataset;
use recon_model::{GroupLevel, IssueTable, RiskBand};
use recon_risk::RiskAggregator;
use recon_validate::ReconEngine;
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn configured_lab_window_changes_findings() {
    let dir = TempDir::new().unwrap();
    let edc = write_file(dir.path(), "edc_visits.csv", "USUBJID,VISITDAT\n001,2025-01-01\n");
    let lab = write_file(dir.path(), "central_lab.csv", "USUBJID,LBDAT,LBORRES\n001,2025-01-04,5.1\n");
    let edc = read_csv_dataset(&edc).unwrap();
    let lab = read_csv_dataset(&lab).unwrap();

    let default_run = ReconEngine::default().run(&edc, Some(&lab), "Labs");
    assert_eq!(default_run.table.discrepancies().len(), 1);

    let config = ReconConfig::from_toml("[recon]\nlab_date_window_days = 5\n").unwrap();
    let widened = ReconEngine::new(config.recon).run(&edc, Some(&lab), "Labs");
    assert_eq!(widened.table, IssueTable::NoIssues);
}

#[test]
fn issues_export_keeps_leading_zeros() {
    let dir = TempDir::new().unwrap();
    let edc = write_file(dir.path(), "edc_ae.csv", "USUBJID,AETERM,AEREL\n001,Pneumonia,RELATED\n");
    let safety = write_file(dir.path(), "argus.csv", "Subject,Serious,Causality_Rel\n001,Y,UNLIKELY\n");
    let edc = read_csv_dataset(&edc).unwrap();
    let safety = read_csv_dataset(&safety).unwrap();

    let outcome = ReconEngine::default().run(&edc, Some(&safety), "sae");
    let mut out = Vec::new();
    write_issues_csv(&mut out, &outcome.table).unwrap();
    let text = String::from_utf8(out).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Subject,Issue,Detail,Action"));
    assert!(lines.next().unwrap().starts_with("001,Causality Conflict,"));
    assert_eq!(lines.next(), None);
}

#[test]
fn outcome_json_carries_metrics() {
    let dir = TempDir::new().unwrap();
    let coded = write_file(
        dir.path(),
        "coded_ae.csv",
        "USUBJID,AETERM,AELLT\n001,Headache,10019211\n002,Headache,10019212\n",
    );
    let coded = read_csv_dataset(&coded).unwrap();

    let outcome = ReconEngine::default().run(&coded, None, "Coding");
    let mut out = Vec::new();
    write_outcome_json(&mut out, &outcome).unwrap();
    let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(json["pillar"], "Coding");
    assert_eq!(json["metrics"]["Total"], 2);
    assert_eq!(json["metrics"]["Issues"], 1);
    assert_eq!(json["table"]["kind"], "Issues");
}

#[test]
fn unknown_mode_exports_error_row() {
    let dir = TempDir::new().unwrap();
    let path = write_file(dir.path(), "vitals.csv", "USUBJID,VSORRES\n001,120\n");
    let dataset = read_csv_dataset(&path).unwrap();

    let outcome = ReconEngine::default().run(&dataset, None, "Vitals");
    let mut out = Vec::new();
    write_issues_csv(&mut out, &outcome.table).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Error\nunknown reconciliation mode 'Vitals'\n"
    );
}

#[test]
fn risk_export_from_count_table() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        dir.path(),
        "site_metrics.csv",
        "SiteID,Queries,SAEs,SubjCount\n101,2,1,1\n102,0,0,4\n",
    );
    let dataset = read_csv_dataset(&path).unwrap();

    let config = ReconConfig::default();
    let table = RiskAggregator::new(config.risk).analyze(&dataset, "site");
    let records = table.records();
    assert_eq!(records[0].group, "101");
    assert_eq!(records[0].band, RiskBand::Medium);
    assert_eq!(records[1].band, RiskBand::Low);

    let mut out = Vec::new();
    write_risk_csv(&mut out, &table, GroupLevel::Site).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text.lines().next(),
        Some("Site,Queries,SAEs,SubjCount,Risk Score,Risk Metric,Risk Status")
    );
    assert_eq!(text.lines().count(), 3);
}
