//! CLI entry point for the dataset cleaning pipeline.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use dataset_cleaner::config::DEFAULT_DATASET_NAME;
use dataset_cleaner::{
    CleaningConfig, CleaningOutcome, CleaningReport, Pipeline, ProgressUpdate, ReportGenerator,
};
use polars::prelude::DataFrame;
use std::path::Path;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Remove duplicate rows and resolve missing values in a CSV or Excel dataset",
    long_about = "Cleans one tabular dataset.\n\n\
                  Exact duplicate rows are separated from the data, numeric columns\n\
                  have missing values replaced with the column mean, and rows missing\n\
                  a categorical value are dropped.\n\n\
                  EXAMPLES:\n  \
                  # Clean a CSV into ./output\n  \
                  dataset-cleaner -i titanic.csv --name Titanic\n\n  \
                  # Preview results without writing files\n  \
                  dataset-cleaner -i sales.xlsx --dry-run --preview 10\n\n  \
                  # Machine-readable report\n  \
                  dataset-cleaner -i data.csv --json"
)]
struct Args {
    /// Path to the CSV or Excel (.xlsx) file to clean
    #[arg(short, long)]
    input: String,

    /// Label used to name the exported files
    #[arg(long, default_value = DEFAULT_DATASET_NAME)]
    name: String,

    /// Output directory for results
    #[arg(short, long, default_value = "output")]
    output: String,

    /// Number of rows to show in the cleaned data and duplicate previews
    #[arg(long, default_value = "5")]
    preview: usize,

    /// Run the cleaning and print the summary without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a JSON report to the output directory
    ///
    /// The report will be saved as <name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let input = Path::new(&args.input);
    if !input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    let config = CleaningConfig::builder()
        .dataset_name(&args.name)
        .output_dir(&args.output)
        .save_to_disk(!args.dry_run)
        .build()?;

    let pipeline = Pipeline::builder()
        .config(config)
        .on_progress(log_progress)
        .build()?;

    run_pipeline(&pipeline, &args, input)
}

fn log_progress(update: ProgressUpdate) {
    info!(
        "[{:>3}%] {}: {}",
        update.percent,
        update.stage.display_name(),
        update.message
    );
}

fn run_pipeline(pipeline: &Pipeline, args: &Args, input: &Path) -> Result<()> {
    let outcome = pipeline.process_file(input).map_err(|e| {
        error!("Cleaning failed: {}", e);
        anyhow!(e)
    })?;

    let exported = pipeline
        .export(&outcome)
        .context("Failed to write output files")?;

    let report = ReportGenerator::build_report(&args.input, &outcome, exported);

    if args.emit_report && !args.dry_run {
        let path = pipeline.report_generator().write_report_to_file(&report)?;
        info!("Report written to {}", path.display());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_human_readable_summary(&report, args);
        print_previews(&outcome, args.preview);
    }

    Ok(())
}

/// Print a human-readable summary of the cleaning results.
///
/// This is the default output when `--json` is not specified.
fn print_human_readable_summary(report: &CleaningReport, args: &Args) {
    println!();
    println!("{}", "=".repeat(80));
    if args.dry_run {
        println!("CLEANING COMPLETE (dry run, nothing written)");
    } else {
        println!("CLEANING COMPLETE");
    }
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, report.shape_before.0, report.shape_before.1
    );
    println!(
        "Output: {} rows x {} columns",
        report.shape_after.0, report.shape_after.1
    );
    println!("Duration: {}ms", report.duration_ms);
    println!();

    println!("Duplicates: {} rows removed", report.total_duplicate_count);
    println!();

    if report.missing_by_column.is_empty() {
        println!("Missing Values: none");
    } else {
        println!("Missing Values:");
        for column in &report.missing_by_column {
            println!("  {:<30} {}", truncate_str(&column.column, 29), column.count);
        }
    }
    println!();

    if !report.imputation_log.is_empty() {
        println!("Actions Taken:");
        for line in &report.imputation_log {
            println!("  - {}", line);
        }
        println!();
    }

    if let Some(files) = &report.exported_files {
        println!("Files Written:");
        println!("  {}", files.cleaned.display());
        if let Some(duplicates) = &files.duplicates {
            println!("  {}", duplicates.display());
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save the JSON report");
    println!("{}", "=".repeat(80));
}

fn print_previews(outcome: &CleaningOutcome, rows: usize) {
    if rows == 0 {
        return;
    }

    print_frame("Cleaned Data", &outcome.cleaned.head(rows));
    match &outcome.duplicates {
        Some(duplicates) => print_frame("Duplicate Records", &duplicates.head(rows)),
        None => println!("\nNo duplicate records found"),
    }
}

fn print_frame(title: &str, frame: &DataFrame) {
    println!();
    println!("{}", title);
    println!("{}", "-".repeat(40));
    println!("{}", frame);
}

/// Truncate a string to a maximum length, adding "..." if truncated.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
