//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and loads `.env`
//! - sets up logging
//! - loads the dataset and replays the selection through the controller
//! - prints reports or writes exports

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::time::Duration;

use clap::Parser;

use crate::cli::{Command, ExportArgs, ReportArgs, SampleArgs, TuiArgs};
use crate::data::SampleConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `autosales` binary.
pub fn run() -> Result<(), AppError> {
    // We want `autosales` and `autosales --sample` to behave like `autosales tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args, cli.verbose),
        Command::Report(args) => {
            crate::logging::init_stderr(cli.verbose)?;
            handle_report(args)
        }
        Command::Export(args) => {
            crate::logging::init_stderr(cli.verbose)?;
            handle_export(args)
        }
        Command::Sample(args) => {
            crate::logging::init_stderr(cli.verbose)?;
            handle_sample(args)
        }
    }
}

fn handle_tui(args: TuiArgs, verbose: bool) -> Result<(), AppError> {
    crate::logging::init_file(args.log_file.as_deref(), verbose)?;
    let source = pipeline::source_from_args(&args.source);
    crate::tui::run(source, Duration::from_secs(args.source.timeout_secs))
}

fn handle_report(args: ReportArgs) -> Result<(), AppError> {
    let dataset = pipeline::load_dataset(&args.source)?;
    let selection = pipeline::selection_from_args(&args.selection);
    let run = pipeline::run_view(dataset, selection);

    println!("{}", crate::report::format_dataset_summary(&run.dataset));
    println!("{}", crate::report::format_view(&run.view, args.width, args.height));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let dataset = pipeline::load_dataset(&args.source)?;
    let selection = pipeline::selection_from_args(&args.selection);
    let run = pipeline::run_view(dataset, selection);

    crate::io::write_layout_json(&args.out, &run.view, &run.dataset.source)?;
    println!("Wrote layout: {}", args.out.display());

    if let Some(dir) = &args.series_dir {
        for path in crate::io::write_series_csvs(dir, &run.view.layout)? {
            println!("Wrote series: {}", path.display());
        }
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        seed: args.seed,
        year_min: args.year_min,
        year_max: args.year_max,
    };
    let dataset = crate::data::generate_dataset(&config)?;

    if args.out == Path::new("-") {
        crate::io::write_dataset_csv(io::stdout().lock(), &dataset)?;
    } else {
        let file = File::create(&args.out)
            .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", args.out.display())))?;
        crate::io::write_dataset_csv(BufWriter::new(file), &dataset)?;
        tracing::info!(path = %args.out.display(), rows = dataset.len(), "wrote sample dataset");
        eprintln!("Wrote {} rows to {}", dataset.len(), args.out.display());
    }
    Ok(())
}

/// Rewrite argv so `autosales` defaults to `autosales tui`.
///
/// Rules:
/// - `autosales`                       -> `autosales tui`
/// - `autosales --sample ...`          -> `autosales tui --sample ...`
/// - `autosales --help/--version/-h`   -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "report" | "export" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
