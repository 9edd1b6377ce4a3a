//! End-to-end reconciliation scenarios, one per pillar.

mod common;

use common::{dataset, issues_for, run};
use recon_model::{IssueTable, ReconOptions};
use recon_validate::pillars::{ae_conmed, coding, death, labs, mh_conmed, pd, query, sae};
use recon_validate::run_recon;

#[test]
fn sae_flags_seriousness_and_causality() {
    let edc = dataset("EDC", &["USUBJID", "AETERM", "AEREL"], &[&["001", "Pneumonia", "RELATED"]]);
    let safety = dataset("ARGUS", &["Subject", "Serious", "Causality_Rel"], &[&["001", "N", "UNLIKELY"]]);

    let outcome = run(&edc, Some(&safety), "SAE");
    assert_eq!(issues_for(&outcome, "001", sae::SERIOUSNESS_MISMATCH).len(), 1);
    assert_eq!(issues_for(&outcome, "001", sae::CAUSALITY_CONFLICT).len(), 1);
    assert_eq!(outcome.table.discrepancies().len(), 2);
    assert_eq!(outcome.metrics.total, 1);
}

#[test]
fn sae_ignores_subjects_on_one_side_only() {
    let edc = dataset("EDC", &["USUBJID", "AEREL"], &[&["001", "RELATED"]]);
    let safety = dataset("ARGUS", &["USUBJID", "AESER", "AEREL"], &[&["002", "N", "UNLIKELY"]]);

    let outcome = run(&edc, Some(&safety), "SAE");
    assert_eq!(outcome.table, IssueTable::NoIssues);
}

#[test]
fn sae_agreeing_records_pass() {
    let edc = dataset("EDC", &["USUBJID", "AEREL"], &[&[" 001", "Related"]]);
    let safety = dataset("ARGUS", &["USUBJID", "AESER", "AEREL"], &[&["001", "Yes", "RELATED"]]);

    let outcome = run(&edc, Some(&safety), "SAE");
    assert_eq!(outcome.table, IssueTable::NoIssues);
}

#[test]
fn labs_date_window() {
    let edc = dataset("EDC", &["USUBJID", "VISITDAT"], &[&["001", "2025-01-01"]]);
    let late = dataset("LAB", &["USUBJID", "LBDAT", "LBORRES"], &[&["001", "2025-01-04", "5.1"]]);
    let close = dataset("LAB", &["USUBJID", "LBDAT", "LBORRES"], &[&["001", "2025-01-02", "5.1"]]);

    let outcome = run(&edc, Some(&late), "Labs");
    let mismatches = issues_for(&outcome, "001", labs::DATE_MISMATCH);
    assert_eq!(mismatches.len(), 1);
    assert_eq!(mismatches[0].detail, "Lab drawn 3 days from visit.");

    let outcome = run(&edc, Some(&close), "Labs");
    assert!(issues_for(&outcome, "001", labs::DATE_MISMATCH).is_empty());
}

#[test]
fn labs_mixed_date_formats_are_compared() {
    let edc = dataset("EDC", &["USUBJID", "VISITDAT"], &[&["001", "01-Jan-2025"]]);
    let lab = dataset("LAB", &["USUBJID", "LBDAT", "LBORRES"], &[&["001", "10/01/2025", "5.1"]]);

    let outcome = run(&edc, Some(&lab), "Labs");
    let mismatches = issues_for(&outcome, "001", labs::DATE_MISMATCH);
    assert_eq!(mismatches[0].detail, "Lab drawn 9 days from visit.");
}

#[test]
fn labs_rejected_sample() {
    let edc = dataset("EDC", &["USUBJID", "VISITDAT"], &[&["001", "2025-01-01"]]);
    let lab = dataset(
        "LAB",
        &["USUBJID", "LBDAT", "LBORRES", "LBCOMM"],
        &[&["001", "2025-01-01", "", "Sample hemolyzed"]],
    );

    let outcome = run(&edc, Some(&lab), "Labs");
    let samples = issues_for(&outcome, "001", labs::SAMPLE_ISSUE);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].detail, "Lab Rejected: Sample hemolyzed");
}

#[test]
fn labs_comment_with_result_is_not_a_sample_issue() {
    let edc = dataset("EDC", &["USUBJID", "VISITDAT"], &[&["001", "2025-01-01"]]);
    let lab = dataset(
        "LAB",
        &["USUBJID", "LBDAT", "LBORRES", "LBCOMM"],
        &[
            &["001", "2025-01-01", "4.2", "Slightly hemolyzed"],
            &["001", "2025-01-01", "3.9", "QNS, redrawn"],
        ],
    );

    let outcome = run(&edc, Some(&lab), "Labs");
    assert!(issues_for(&outcome, "001", labs::SAMPLE_ISSUE).is_empty());
    assert_eq!(outcome.table, IssueTable::NoIssues);
}

#[test]
fn labs_unparseable_dates_are_skipped() {
    let edc = dataset("EDC", &["USUBJID", "VISITDAT"], &[&["001", "not a date"]]);
    let lab = dataset("LAB", &["USUBJID", "LBDAT", "LBORRES"], &[&["001", "2025-03-01", "5.1"]]);

    let outcome = run(&edc, Some(&lab), "Labs");
    assert_eq!(outcome.table, IssueTable::NoIssues);
}

#[test]
fn death_ghosts_and_zombies() {
    let ae = dataset("AE", &["USUBJID", "AEOUT"], &[&["A", "FATAL"], &["B", "RECOVERED"]]);
    let ds = dataset("DS", &["USUBJID", "DSREAS"], &[&["A", "COMPLETED"], &["B", "DEATH"]]);

    let outcome = run(&ae, Some(&ds), "Death");
    assert_eq!(issues_for(&outcome, "A", death::ZOMBIE_RECORD).len(), 1);
    assert_eq!(issues_for(&outcome, "B", death::GHOST_RECORD).len(), 1);
    assert_eq!(outcome.table.discrepancies().len(), 2);
}

#[test]
fn death_is_reported_once_per_subject() {
    let ae = dataset(
        "AE",
        &["USUBJID", "AEOUT"],
        &[&["A", "Fatal"], &["A", "NOT RECOVERED"], &["A", "RECOVERING"]],
    );
    let ds = dataset("DS", &["USUBJID", "DSREAS"], &[&["A", "ONGOING"], &["A", "ONGOING"]]);

    let outcome = run(&ae, Some(&ds), "Death");
    assert_eq!(issues_for(&outcome, "A", death::ZOMBIE_RECORD).len(), 1);
}

#[test]
fn coding_split_terms() {
    let ae = dataset(
        "AE",
        &["USUBJID", "AETERM", "AELLT"],
        &[
            &["001", "Headache", "10019211"],
            &["002", "Headache", "10019212"],
            &["003", "Headache", "nan"],
            &["004", "Nausea", "10028813"],
            &["005", "Nausea", "10028813"],
        ],
    );

    let outcome = run(&ae, None, "Coding");
    let splits = issues_for(&outcome, coding::MULTIPLE_SUBJECTS, coding::SPLIT_CODING);
    assert_eq!(splits.len(), 1);
    assert_eq!(splits[0].detail, "'Headache' coded as ['10019211', '10019212']");
    assert_eq!(outcome.metrics.total, 5);
}

#[test]
fn ae_conmed_orphans() {
    let ae = dataset("AE", &["USUBJID", "AETERM"], &[&["001", "Severe headache"]]);
    let cm = dataset(
        "CM",
        &["USUBJID", "CMINDC"],
        &[
            &["001", "Headache"],
            &["001", "Hypertension"],
            &["001", "Prophylaxis"],
            &["002", "Nausea"],
            &["002", ""],
        ],
    );

    let outcome = run(&ae, Some(&cm), "AE_ConMed");
    let orphans = outcome.table.discrepancies();
    assert_eq!(orphans.len(), 2);
    assert_eq!(
        issues_for(&outcome, "001", ae_conmed::ORPHAN_CONMED)[0].detail,
        "Indication 'HYPERTENSION' has no matching AE."
    );
    assert_eq!(issues_for(&outcome, "002", ae_conmed::ORPHAN_CONMED).len(), 1);
    assert_eq!(outcome.metrics.total, 1);
    assert_eq!(outcome.metrics.rate, 200.0);
}

#[test]
fn mh_conmed_missing_history() {
    let cm = dataset(
        "CM",
        &["USUBJID", "CMINDC"],
        &[&["001", "Diabetes"], &["001", "Hypertension"], &["002", "Supplement"]],
    );
    let mh = dataset("MH", &["USUBJID", "MHTERM"], &[&["001", "Type 2 diabetes"]]);

    let outcome = run(&cm, Some(&mh), "MH_ConMed");
    let missing = issues_for(&outcome, "001", mh_conmed::MISSING_HISTORY);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].detail, "Med for 'HYPERTENSION' exists, but not in Medical History.");
    // SUPPLEMENT is only excluded for AE matching.
    assert_eq!(issues_for(&outcome, "002", mh_conmed::MISSING_HISTORY).len(), 1);
}

#[test]
fn query_log_review() {
    let queries = dataset(
        "QUERIES",
        &["SubjectID", "QueryStatus", "DaysOpen", "QueryResponse", "FormOID"],
        &[
            &["001", "Open", "45", "", "AE"],
            &["002", "Re-Opened", "3", "", "AE"],
            &["003", "Answered", "2", "Will update later", "VS"],
            &["004", "Open", "abc", "", "LB"],
            &["005", "Closed", "90", "", "DM"],
            &["006", "Closed", "1", "", "EX"],
            &["007", "Closed", "1", "", "CM"],
            &["008", "Closed", "1", "", "MH"],
        ],
    );

    let outcome = run(&queries, None, "Query_Recon");
    let aging = issues_for(&outcome, "001", query::AGING_QUERY);
    assert_eq!(aging.len(), 1);
    assert_eq!(aging[0].detail, "Open 45 days");
    assert_eq!(aging[0].action, "Escalate");
    assert_eq!(issues_for(&outcome, "002", query::PING_PONG_QUERY).len(), 1);
    assert_eq!(issues_for(&outcome, "003", query::LAZY_ANSWER)[0].detail, "Response: 'WILL UPDATE LATER'");
    assert!(issues_for(&outcome, "004", query::AGING_QUERY).is_empty());
    assert!(issues_for(&outcome, "005", query::AGING_QUERY).is_empty());

    let hotspot = issues_for(&outcome, query::ALL_SUBJECTS, query::FORM_HOTSPOT);
    assert_eq!(hotspot.len(), 0, "AE holds exactly 25% of queries");
    assert_eq!(outcome.metrics.total, 8);
}

#[test]
fn query_form_hotspot() {
    let queries = dataset(
        "QUERIES",
        &["SubjectID", "QueryStatus", "FormName", "Revisions"],
        &[
            &["001", "Closed", "AE", "5"],
            &["002", "Closed", "AE", "0"],
            &["003", "Closed", "VS", "1"],
            &["004", "Closed", "", "1"],
            &["005", "Closed", "", "1"],
        ],
    );

    let outcome = run(&queries, None, "Query_Recon");
    let hotspots = issues_for(&outcome, query::ALL_SUBJECTS, query::FORM_HOTSPOT);
    let details: Vec<&str> = hotspots.iter().map(|d| d.detail.as_str()).collect();
    assert_eq!(details, vec!["'AE' has >25% of queries", "'Unknown' has >25% of queries"]);
    assert_eq!(issues_for(&outcome, "001", query::PING_PONG_QUERY).len(), 1);
}

#[test]
fn pd_zombie_visits_and_unreported_deviations() {
    let pd_log = dataset(
        "PD",
        &["USUBJID", "Category", "Visit"],
        &[&["001", "Missed Visit", "Week 4"], &["002", "Out of window", "Week 8"]],
    );
    let edc = dataset(
        "EDC",
        &["USUBJID", "Folder", "VisitDate", "Window"],
        &[
            &["001", "WEEK 4 VISIT", "2025-02-01", "IN"],
            &["002", "Week 8", "2025-03-01", "OUT"],
            &["003", "Week 12", "2025-04-01", "Out of window"],
        ],
    );

    let outcome = run(&pd_log, Some(&edc), "PD_Recon");
    let zombies = issues_for(&outcome, "001", pd::ZOMBIE_VISIT);
    assert_eq!(zombies.len(), 1);
    assert_eq!(
        zombies[0].detail,
        "PD Log says 'WEEK 4' Missed, but EDC has Date 2025-02-01."
    );
    assert!(issues_for(&outcome, "002", pd::UNREPORTED_DEVIATION).is_empty());
    let unreported = issues_for(&outcome, "003", pd::UNREPORTED_DEVIATION);
    assert_eq!(unreported[0].detail, "Visit 'WEEK 12' OOW in EDC, missing in PD Log.");
    assert_eq!(unreported[0].action, "Site to Report PD");
    assert_eq!(outcome.metrics.total, 2);
}

#[test]
fn pd_without_window_column_skips_unreported_check() {
    let pd_log = dataset("PD", &["USUBJID", "Category", "Visit"], &[&["001", "Other", "Week 4"]]);
    let edc = dataset("EDC", &["USUBJID", "Folder", "VisitDate"], &[&["002", "Week 8", "2025-03-01"]]);

    let outcome = run(&pd_log, Some(&edc), "PD_Recon");
    assert_eq!(outcome.table, IssueTable::NoIssues);
}

#[test]
fn custom_lab_window_is_honoured() {
    let edc = dataset("EDC", &["USUBJID", "VISITDAT"], &[&["001", "2025-01-01"]]);
    let lab = dataset("LAB", &["USUBJID", "LBDAT", "LBORRES"], &[&["001", "2025-01-04", "5.1"]]);

    let options = ReconOptions::default().with_lab_date_window(5);
    let outcome = run_recon(&edc, Some(&lab), "Labs", &options);
    assert_eq!(outcome.table, IssueTable::NoIssues);
}
