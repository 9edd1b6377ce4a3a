use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use recon_cli::config::ReconConfig;
use recon_cli::export::{write_issues_csv, write_json, write_outcome_json, write_risk_csv};
use recon_cli::logging::redact_value;
use recon_ingest::read_csv_dataset;
use recon_model::{GroupLevel, ReconOutcome, RiskTable};
use recon_risk::{MonitoringVisitReport, MvrMetrics, RiskAggregator, monitoring_visit_report};
use recon_validate::{PillarInfo, PillarRegistry, ReconEngine};

use crate::cli::{MvrArgs, OutputArgs, OutputFormatArg, RiskArgs, RunArgs};

/// Result of the `risk` command and the level it was grouped by.
pub struct RiskRun {
    pub table: RiskTable,
    pub level: Option<GroupLevel>,
}

pub fn run_modes() -> Vec<PillarInfo> {
    PillarRegistry::standard().catalogue()
}

pub fn run_reconcile(args: &RunArgs) -> Result<ReconOutcome> {
    let span = info_span!("run", mode = %args.mode);
    let _guard = span.enter();

    let mut config = ReconConfig::load_or_default(args.config.as_deref())?;
    if let Some(days) = args.lab_window {
        config.recon.lab_date_window_days = days;
    }
    if let Some(days) = args.aging_days {
        config.recon.aging_query_days = days;
    }

    let primary = read_csv_dataset(&args.primary)
        .with_context(|| format!("load primary extract {}", args.primary.display()))?;
    info!(rows = primary.len(), dataset = primary.name(), "loaded primary extract");
    let secondary = match &args.secondary {
        Some(path) => {
            let dataset = read_csv_dataset(path)
                .with_context(|| format!("load secondary extract {}", path.display()))?;
            info!(rows = dataset.len(), dataset = dataset.name(), "loaded secondary extract");
            Some(dataset)
        }
        None => None,
    };

    let engine = ReconEngine::new(config.recon);
    let outcome = engine.run(&primary, secondary.as_ref(), &args.mode);
    if outcome.table.is_error() {
        warn!("reconciliation returned an error table");
    }
    for discrepancy in outcome.table.discrepancies() {
        debug!(
            subject = redact_value(&discrepancy.subject),
            issue = %discrepancy.issue_type,
            "discrepancy"
        );
    }

    match args.output.format {
        OutputFormatArg::Table => {}
        OutputFormatArg::Json => {
            with_output(&args.output, |writer| write_outcome_json(writer, &outcome))?;
        }
        OutputFormatArg::Csv => {
            with_output(&args.output, |writer| write_issues_csv(writer, &outcome.table))?;
        }
    }
    Ok(outcome)
}

pub fn run_risk(args: &RiskArgs) -> Result<RiskRun> {
    let span = info_span!("risk_command", level = %args.level);
    let _guard = span.enter();

    let mut thresholds = ReconConfig::load_or_default(args.config.as_deref())?.risk;
    if let Some(high) = args.high {
        thresholds.high = high;
    }
    if let Some(medium) = args.medium {
        thresholds.medium = medium;
    }

    let dataset = read_csv_dataset(&args.input)
        .with_context(|| format!("load count table {}", args.input.display()))?;
    let table = RiskAggregator::new(thresholds).analyze(&dataset, &args.level);
    let level = args.level.parse::<GroupLevel>().ok();

    match (args.output.format, level) {
        (OutputFormatArg::Table, _) => {}
        (OutputFormatArg::Json, _) => {
            with_output(&args.output, |writer| write_json(writer, &table))?;
        }
        (OutputFormatArg::Csv, level) => {
            let level = level.unwrap_or(GroupLevel::Site);
            with_output(&args.output, |writer| write_risk_csv(writer, &table, level))?;
        }
    }
    Ok(RiskRun { table, level })
}

pub fn run_mvr(args: &MvrArgs) -> Result<MonitoringVisitReport> {
    let report = monitoring_visit_report(
        &args.site,
        MvrMetrics {
            sdv: args.sdv,
            queries: args.queries,
            saes: args.saes,
        },
    );
    info!(band = %report.band, "{report}");
    if args.json {
        let stdout = io::stdout();
        let mut writer = stdout.lock();
        write_json(&mut writer, &report)?;
        writeln!(writer)?;
    }
    Ok(report)
}

/// Hand the command's writer to `write`: the output file, or stdout.
fn with_output<F>(output: &OutputArgs, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    match output.output.as_deref() {
        Some(path) => {
            let mut writer = create_output(path)?;
            write(&mut writer)?;
            writer
                .flush()
                .with_context(|| format!("write {}", path.display()))?;
            info!(path = %path.display(), "wrote results");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write(&mut writer)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
