//! Command-line parsing for the automobile sales dashboard.
//!
//! Argument parsing and command dispatch stay separate from the aggregation
//! and controller code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::{DEFAULT_DATA_URL, DEFAULT_TIMEOUT_SECS};
use crate::domain::{ReportMode, YEAR_MAX, YEAR_MIN};
use crate::error::DashboardError;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "autosales", version, about = "Automobile Sales Statistics Dashboard")]
pub struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive dashboard.
    Tui(TuiArgs),
    /// Compute one view and print it as text.
    Report(ReportArgs),
    /// Compute one view and write it as layout JSON (and optional series CSVs).
    Export(ExportArgs),
    /// Write the synthetic dataset as CSV.
    Sample(SampleArgs),
}

/// Where to read the sales table from. `--csv` wins over `--sample`, which
/// wins over `--url`.
#[derive(Debug, Args, Clone)]
pub struct SourceArgs {
    /// Local CSV file with the sales table.
    #[arg(long, value_name = "PATH")]
    pub csv: Option<PathBuf>,

    /// URL of the published CSV.
    #[arg(long, env = "AUTOSALES_DATA_URL", default_value = DEFAULT_DATA_URL)]
    pub url: String,

    /// Use the deterministic synthetic dataset instead of fetching.
    #[arg(long)]
    pub sample: bool,

    /// Seed for the synthetic dataset.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// HTTP timeout in seconds.
    #[arg(long, env = "AUTOSALES_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

/// The two selector values.
#[derive(Debug, Args, Clone)]
pub struct SelectionArgs {
    /// Report type: yearly, recession, or a dropdown label such as
    /// "Recession Period Statistics". Omitted means no report selected.
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<ReportMode>,

    /// Year for the yearly report.
    #[arg(long)]
    pub year: Option<i32>,
}

fn parse_mode(value: &str) -> Result<ReportMode, DashboardError> {
    ReportMode::parse_selector(Some(value))
}

#[derive(Debug, Args, Clone)]
pub struct TuiArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write logs to this file (the dashboard owns the terminal).
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Line plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Line plot height (rows).
    #[arg(long, default_value_t = 14)]
    pub height: usize,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Layout JSON output path.
    #[arg(long, value_name = "JSON")]
    pub out: PathBuf,

    /// Also write one CSV per chart into this directory.
    #[arg(long, value_name = "DIR")]
    pub series_dir: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// CSV output path ("-" for stdout).
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, default_value_t = YEAR_MIN)]
    pub year_min: i32,

    #[arg(long, default_value_t = YEAR_MAX)]
    pub year_max: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_parses_mode_and_year() {
        let cli = Cli::parse_from(["autosales", "report", "--mode", "yearly", "--year", "2015", "--sample"]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.selection.mode, Some(ReportMode::Yearly));
        assert_eq!(args.selection.year, Some(2015));
        assert!(args.source.sample);
        assert_eq!(args.width, 72);
    }

    #[test]
    fn recession_mode_name_and_unset_is_not_selectable() {
        let cli = Cli::parse_from(["autosales", "export", "--mode", "recession", "--out", "x.json"]);
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.selection.mode, Some(ReportMode::RecessionPeriod));
        assert!(Cli::try_parse_from(["autosales", "report", "--mode", "unset"]).is_err());

        let cli = Cli::parse_from(["autosales", "report", "--mode", "Yearly Statistics"]);
        let Command::Report(args) = cli.command else {
            panic!("expected report");
        };
        assert_eq!(args.selection.mode, Some(ReportMode::Yearly));
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["autosales", "sample", "--out", "-", "-v"]);
        assert!(cli.verbose);
    }
}
