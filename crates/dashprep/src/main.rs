//! CLI entry point for the dashboard data toolkit.

use anyhow::{Result, anyhow, bail};
use clap::{Parser, Subcommand};
use dashprep::{
    DatasetCache, PrepConfig, PrepPipeline, PrepReport, TermSurface, TransformSpec, WriteMode,
    render_dashboard,
};
use dotenv::dotenv;
use std::env;
use tracing::info;

/// Environment variable consulted by `show` when `--data` is not given.
const DATA_PATH_ENV: &str = "DASHPREP_DATA_PATH";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Dashboard data preparation and preview",
    long_about = "Prepare a cleaned Parquet dataset from a raw CSV and preview it.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  DASHPREP_DATA_PATH    Default data path for `show` (read via .env too)\n\n\
                  EXAMPLES:\n  \
                  # Clean a CSV, dropping rows with missing Revenue\n  \
                  dashprep prepare -i raw.csv -o cleaned.parquet --drop-missing Revenue\n\n  \
                  # Also derive a doubled column\n  \
                  dashprep prepare -i raw.csv -o cleaned.parquet \\\n      \
                  --drop-missing Revenue --derive revenue_x2=2xRevenue\n\n  \
                  # Preview the cleaned dataset in the terminal\n  \
                  dashprep show --data cleaned.parquet"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the preparation pipeline: CSV in, cleaned Parquet out
    Prepare(PrepareArgs),
    /// Load the cleaned dataset (cached) and render its summary views
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
struct PrepareArgs {
    /// Path to the raw CSV file
    #[arg(short, long)]
    input: String,

    /// Path the cleaned Parquet file is written to
    #[arg(short, long)]
    output: String,

    /// Drop rows with a missing value in this column (repeatable).
    ///
    /// If the column is absent, the step is skipped with a warning.
    #[arg(long, value_name = "COLUMN")]
    drop_missing: Vec<String>,

    /// Derive a scaled column, as OUTPUT=FACTORxSOURCE (repeatable).
    ///
    /// Example: --derive revenue_x2=2xRevenue
    #[arg(long, value_name = "OUTPUT=FACTORxSOURCE")]
    derive: Vec<String>,

    /// Write the output in place instead of write-then-rename
    #[arg(long)]
    in_place: bool,

    /// Output the run report as JSON to stdout instead of a human summary
    ///
    /// Disables all progress logs; only the JSON report is written.
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args, Debug)]
struct ShowArgs {
    /// Path of the cleaned Parquet file (falls back to DASHPREP_DATA_PATH)
    #[arg(short, long)]
    data: Option<String>,
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
    let cli = Cli::parse();

    let json_output = matches!(&cli.command, Command::Prepare(args) if args.json);
    init_logging(&cli.log_level, cli.quiet, json_output);

    // Load deployment-time variables from .env, if present
    dotenv().ok();

    match cli.command {
        Command::Prepare(args) => run_prepare(args),
        Command::Show(args) => run_show(args),
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    let mut builder = PrepConfig::builder()
        .source_path(&args.input)
        .output_path(&args.output);

    for column in &args.drop_missing {
        builder = builder.transform(TransformSpec::DropMissing {
            column: column.clone(),
        });
    }
    for spec in &args.derive {
        builder = builder.transform(parse_derive(spec)?);
    }
    if args.in_place {
        builder = builder.write_mode(WriteMode::InPlace);
    }

    let config = builder.build()?;
    let report = PrepPipeline::new(config).run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    info!("Preparation complete");
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let path = match args.data.or_else(|| env::var(DATA_PATH_ENV).ok()) {
        Some(path) => path,
        None => bail!("no data path given: pass --data or set {DATA_PATH_ENV}"),
    };

    let cache = DatasetCache::new();
    let mut surface = TermSurface;

    // The failure has already been rendered to the surface; exit nonzero
    // without printing it a second time.
    if render_dashboard(&cache, &path, &mut surface).is_err() {
        std::process::exit(1);
    }

    Ok(())
}

/// Parse a `--derive` argument of the form `OUTPUT=FACTORxSOURCE`.
fn parse_derive(spec: &str) -> Result<TransformSpec> {
    let (output, rhs) = spec
        .split_once('=')
        .ok_or_else(|| anyhow!("invalid --derive '{spec}': expected OUTPUT=FACTORxSOURCE"))?;
    let (factor, source) = rhs
        .split_once('x')
        .ok_or_else(|| anyhow!("invalid --derive '{spec}': expected OUTPUT=FACTORxSOURCE"))?;
    let factor: f64 = factor
        .parse()
        .map_err(|_| anyhow!("invalid --derive '{spec}': '{factor}' is not a number"))?;

    Ok(TransformSpec::DeriveScaled {
        source: source.to_string(),
        output: output.to_string(),
        factor,
    })
}

/// Human-readable run summary.
///
/// Note: uses `println!` intentionally for user-facing CLI output, visible
/// regardless of log level settings.
fn print_report(report: &PrepReport) {
    println!("\n{}", "=".repeat(60));
    println!("PREPARATION SUMMARY");
    println!("{}", "=".repeat(60));
    println!(
        "  Rows:    {} -> {} ({} removed)",
        report.rows_before,
        report.rows_after,
        report.rows_removed()
    );
    println!(
        "  Columns: {} -> {}",
        report.columns_before, report.columns_after
    );

    if report.applied_steps.is_empty() {
        println!("  Steps:   none applied");
    } else {
        println!("  Steps:");
        for step in &report.applied_steps {
            println!("    - {step}");
        }
    }

    for skip in &report.skipped_steps {
        println!(
            "  Skipped: {} (missing columns: {})",
            skip.step,
            skip.missing_columns.join(", ")
        );
    }

    println!("  Output:  {}", report.output_path.display());
    println!("  Took:    {}ms", report.duration_ms);
    println!("{}", "=".repeat(60));
}
