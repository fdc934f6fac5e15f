mod table;

use anyhow::{anyhow, Context};
use clap::Parser;
use dirsize_core::{AggregateMsg, DirectoryAggregator, ResultSet};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_FAILURE: u8 = 1;
const EXIT_PATH: u8 = 3;

#[derive(Parser, Debug)]
#[command(
    name = "dirsize",
    about = "Show the size of every subfolder under a directory"
)]
struct Args {
    /// The folder path to check the size of
    #[arg(short, long, value_parser = parse_root)]
    path: PathBuf,
    /// Do not show the progress bar
    #[arg(short, long)]
    quiet: bool,
    /// List entries that could not be read after the report
    #[arg(long)]
    show_errors: bool,
    /// Also write the report as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,
    /// Also write the report as CSV to this file
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,
}

fn parse_root(s: &str) -> Result<PathBuf, String> {
    if s.trim().is_empty() {
        return Err("path must not be empty".to_string());
    }
    Ok(PathBuf::from(s))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let aggregator = match DirectoryAggregator::initialize(&args.path) {
        Ok(a) => a,
        Err(e) => {
            tracing::debug!(error = %e, "initialize failed");
            eprintln!(
                "Could not open {} or path does not exist",
                args.path.display()
            );
            return ExitCode::from(EXIT_PATH);
        }
    };

    match report(&args, aggregator) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

fn report(args: &Args, aggregator: DirectoryAggregator) -> anyhow::Result<()> {
    let results = scan(aggregator, args.quiet)?;

    let mut stdout = std::io::stdout().lock();
    table::render(&results, &mut stdout).context("writing report")?;
    stdout.flush()?;

    if args.show_errors && !results.skipped().is_empty() {
        eprintln!();
        eprintln!("Skipped {} entries:", results.skipped().len());
        for s in results.skipped() {
            eprintln!("  {}: {}", s.path.display(), s.reason);
        }
    }

    if let Some(path) = &args.json {
        let json = dirsize_core::export::to_json(&results);
        let text = serde_json::to_string_pretty(&json)?;
        std::fs::write(path, text)
            .with_context(|| format!("writing JSON report to {}", path.display()))?;
    }
    if let Some(path) = &args.csv {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating CSV report {}", path.display()))?;
        dirsize_core::export::to_csv(&results, file)
            .with_context(|| format!("writing CSV report to {}", path.display()))?;
    }
    Ok(())
}

/// Runs the aggregation on its own thread and ticks a progress bar per
/// finished subdirectory.
fn scan(aggregator: DirectoryAggregator, quiet: bool) -> anyhow::Result<ResultSet> {
    let (tx, rx) = crossbeam_channel::unbounded::<AggregateMsg>();
    std::thread::spawn(move || aggregator.run_reporting(tx));

    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(0);
        if let Ok(style) =
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} folders {wide_msg}")
        {
            bar.set_style(style);
        }
        bar
    };

    let mut results = None;
    while let Ok(msg) = rx.recv() {
        match msg {
            AggregateMsg::Started { subdirectories } => bar.set_length(subdirectories),
            AggregateMsg::DirDone(record) => {
                bar.set_message(record.path.display().to_string());
                bar.inc(1);
            }
            AggregateMsg::Done(rs) => {
                results = Some(rs);
                break;
            }
        }
    }
    bar.finish_and_clear();

    results.ok_or_else(|| anyhow!("aggregation stopped before producing a result"))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
