//! CLI argument definitions for the reconciliation tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "recon",
    version,
    about = "Clinical data reconciliation - cross-check EDC, safety, lab and query extracts",
    long_about = "Reconcile clinical trial data extracts and rank sites by risk.\n\n\
                  Runs one reconciliation pillar per call (SAE, Labs, Death, Coding,\n\
                  AE_ConMed, MH_ConMed, Query_Recon, PD_Recon) over CSV extracts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include subject identifiers in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one reconciliation pillar over a primary and optional secondary extract.
    Run(RunArgs),

    /// Rank sites, subjects or countries by weighted risk score.
    Risk(RiskArgs),

    /// Score a site for a monitoring visit report.
    Mvr(MvrArgs),

    /// List the available reconciliation modes.
    Modes,
}

/// Where and how result tables are written.
#[derive(Args, Clone)]
pub struct OutputArgs {
    /// Result format.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Write results to a file instead of stdout (csv and json only).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Reconciliation mode (case-insensitive), e.g. SAE or Query_Recon.
    #[arg(value_name = "MODE")]
    pub mode: String,

    /// Primary extract (CSV).
    #[arg(value_name = "PRIMARY")]
    pub primary: PathBuf,

    /// Secondary extract (CSV), required by two-dataset modes.
    #[arg(value_name = "SECONDARY")]
    pub secondary: Option<PathBuf>,

    /// TOML configuration file with [recon] options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Tolerated gap in days between visit and lab draw dates.
    #[arg(long = "lab-window", value_name = "DAYS")]
    pub lab_window: Option<i64>,

    /// Open queries older than this many days are aging.
    #[arg(long = "aging-days", value_name = "DAYS")]
    pub aging_days: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser)]
pub struct RiskArgs {
    /// Count table (CSV) with query, SAE, deviation and subject counts.
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Grouping level: site, subject or country.
    #[arg(long = "level", default_value = "site")]
    pub level: String,

    /// TOML configuration file with [risk] thresholds.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Scores above this are HIGH.
    #[arg(long = "high", value_name = "SCORE")]
    pub high: Option<f64>,

    /// Scores above this are MEDIUM.
    #[arg(long = "medium", value_name = "SCORE")]
    pub medium: Option<f64>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser)]
pub struct MvrArgs {
    /// Site name shown in the report.
    #[arg(long = "site")]
    pub site: String,

    /// Source data verification completed, in percent.
    #[arg(long = "sdv", default_value_t = 0.0)]
    pub sdv: f64,

    /// Open query count.
    #[arg(long = "queries", default_value_t = 0.0)]
    pub queries: f64,

    /// SAE count.
    #[arg(long = "saes", default_value_t = 0.0)]
    pub saes: f64,

    /// Print the report as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
