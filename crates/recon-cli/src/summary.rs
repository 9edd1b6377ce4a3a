use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use recon_model::{
    GroupLevel, IssueTable, NO_ISSUES_MESSAGE, ReconOutcome, RiskBand, RiskTable, format_numeric,
};
use recon_risk::MonitoringVisitReport;
use recon_validate::PillarInfo;

pub fn print_outcome(outcome: &ReconOutcome) {
    if let Some(pillar) = outcome.pillar {
        println!("Mode: {pillar}");
    }
    match &outcome.table {
        IssueTable::Error(message) => {
            eprintln!("error: {message}");
        }
        IssueTable::NoIssues => {
            let mut table = Table::new();
            table.set_header(vec![header_cell("Status")]);
            apply_table_style(&mut table);
            table.add_row(vec![Cell::new(NO_ISSUES_MESSAGE).fg(Color::Green)]);
            println!("{table}");
        }
        IssueTable::Issues(issues) => {
            let mut table = Table::new();
            table.set_header(vec![
                header_cell("Subject"),
                header_cell("Issue"),
                header_cell("Detail"),
                header_cell("Action"),
            ]);
            apply_table_style(&mut table);
            for issue in issues {
                table.add_row(vec![
                    Cell::new(&issue.subject),
                    Cell::new(&issue.issue_type).fg(Color::Yellow),
                    Cell::new(&issue.detail),
                    placeholder_cell(&issue.action),
                ]);
            }
            println!("{table}");
        }
    }
    print_metrics(outcome);
    print_breakdown(outcome);
}

fn print_metrics(outcome: &ReconOutcome) {
    let metrics = &outcome.metrics;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Total"),
        header_cell("Issues"),
        header_cell("Rate"),
    ]);
    apply_table_style(&mut table);
    for index in 0..3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(metrics.total),
        count_cell(metrics.issues, Color::Red),
        Cell::new(format!("{}%", format_numeric(metrics.rate))),
    ]);
    println!();
    println!("Metrics:");
    println!("{table}");
}

fn print_breakdown(outcome: &ReconOutcome) {
    let breakdown = &outcome.breakdown;
    if breakdown.by_issue.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Issue"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (issue, count) in &breakdown.by_issue {
        table.add_row(vec![Cell::new(issue), Cell::new(count)]);
    }
    println!();
    println!("By issue:");
    println!("{table}");

    let mut table = Table::new();
    table.set_header(vec![header_cell("Subject"), header_cell("Discrepancies")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (subject, count) in &breakdown.top_subjects {
        table.add_row(vec![Cell::new(subject), Cell::new(count)]);
    }
    println!();
    println!("Top subjects:");
    println!("{table}");
}

pub fn print_risk(risk: &RiskTable, level: GroupLevel) {
    let records = match risk {
        RiskTable::Error(message) => {
            eprintln!("error: {message}");
            return;
        }
        RiskTable::Records(records) => records,
    };
    let aggregate_columns: Vec<&str> = records
        .first()
        .map(|record| record.aggregates.iter().map(|(name, _)| name.as_str()).collect())
        .unwrap_or_default();

    let mut header = vec![header_cell(level.as_str())];
    header.extend(aggregate_columns.iter().map(|name| header_cell(name)));
    header.extend([
        header_cell("Risk Score"),
        header_cell("Risk Metric"),
        header_cell("Risk Status"),
    ]);
    let mut table = Table::new();
    table.set_header(header);
    apply_table_style(&mut table);
    for index in 1..=aggregate_columns.len() + 1 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for record in records {
        let mut row = vec![Cell::new(&record.group)];
        row.extend(
            record
                .aggregates
                .iter()
                .map(|(_, value)| Cell::new(format_numeric(*value))),
        );
        row.push(Cell::new(format_numeric(record.normalized_score)).add_attribute(Attribute::Bold));
        row.push(dim_cell(record.metric.label()));
        row.push(band_cell(record.band));
        table.add_row(row);
    }
    println!("{table}");
}

pub fn print_mvr(report: &MonitoringVisitReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Site"),
        header_cell("SDV %"),
        header_cell("Queries"),
        header_cell("SAEs"),
        header_cell("Score"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for index in 1..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(&report.site),
        Cell::new(format_numeric(report.metrics.sdv)),
        Cell::new(format_numeric(report.metrics.queries)),
        Cell::new(format_numeric(report.metrics.saes)),
        Cell::new(format_numeric(report.score)).add_attribute(Attribute::Bold),
        band_cell(report.band),
    ]);
    println!("{table}");
}

pub fn print_catalogue(catalogue: &[PillarInfo]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Mode"),
        header_cell("Description"),
        header_cell("Primary"),
        header_cell("Secondary"),
    ]);
    apply_table_style(&mut table);
    for info in catalogue {
        table.add_row(vec![
            Cell::new(info.key.as_str()).add_attribute(Attribute::Bold),
            Cell::new(info.label),
            Cell::new(info.primary),
            info.secondary.map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn placeholder_cell(value: &str) -> Cell {
    if value == "-" {
        dim_cell(value)
    } else {
        Cell::new(value)
    }
}

fn band_cell(band: RiskBand) -> Cell {
    let color = match band {
        RiskBand::High => Color::Red,
        RiskBand::Medium => Color::Yellow,
        RiskBand::Low => Color::Green,
    };
    Cell::new(band.label())
        .fg(color)
        .add_attribute(Attribute::Bold)
}
