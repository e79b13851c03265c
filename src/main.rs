use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use choice_eval_rs::{
    DEFAULT_ACTIVITY_NAME, DEFAULT_BATCH_SIZE, DEFAULT_ENDPOINT, DEFAULT_EXPECTED_TOTAL,
    DEFAULT_N_SHOT, DEFAULT_WORKER_COUNT, HttpModel, InferenceConfig, JsonlSink, PipelineConfig,
    RunSummary, evaluate, setup_logging, summarize_results,
};

const SUMMARY_FILE: &str = "accuracy_metadata.txt";

/// Evaluates a language model on a two-choice commonsense dataset.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Runs the evaluation of one dataset
    Run(RunArgs),
    /// Prints the accuracy report of a results file written by an earlier run
    Summarize {
        /// Path to a results.jsonl file
        results: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// CSV dataset with the columns premise, choice1, choice2, question and label
    dataset: PathBuf,

    /// Directory receiving results.jsonl, progress.jsonl and the accuracy report
    #[arg(long, env = "EVAL_OUTPUT_DIR", default_value = "eval-output")]
    output_dir: PathBuf,

    /// Chat-completions endpoint of the evaluated model
    #[arg(long, env = "EVAL_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Per-request timeout in seconds; requests wait indefinitely when unset
    #[arg(long, env = "EVAL_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[arg(long, env = "EVAL_WORKERS", default_value_t = DEFAULT_WORKER_COUNT)]
    workers: usize,

    #[arg(long, env = "EVAL_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Number of demonstrations in front of every question
    #[arg(long, env = "EVAL_N_SHOT", default_value_t = DEFAULT_N_SHOT)]
    n_shot: usize,

    /// Dataset size assumed for the ETA
    #[arg(long, env = "EVAL_EXPECTED_TOTAL", default_value_t = DEFAULT_EXPECTED_TOTAL)]
    expected_total: u64,

    /// Seconds between two progress snapshots
    #[arg(long, env = "EVAL_PROGRESS_SECS", default_value_t = 5)]
    progress_secs: u64,

    /// Activity the questions are about, as named in the prompt
    #[arg(long, env = "EVAL_ACTIVITY", default_value = DEFAULT_ACTIVITY_NAME)]
    activity: String,
}

fn main() -> Result<()> {
    // Before parsing, so that the file can provide RUST_LOG and the EVAL_* variables
    let dotenv = dotenvy::dotenv();
    setup_logging()?;
    if let Err(e) = dotenv {
        debug!("no .env file loaded: {e}");
    }

    match Cli::parse().command {
        Command::Run(args) => run(args),
        Command::Summarize { results } => summarize(&results),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let reader = File::open(&args.dataset)
        .with_context(|| format!("cannot open dataset {}", args.dataset.display()))?;

    let model = HttpModel::new(InferenceConfig {
        endpoint: args.endpoint.clone(),
        timeout: args.timeout_secs.map(Duration::from_secs),
    })?;
    let mut sink = JsonlSink::create(&args.output_dir).with_context(|| {
        format!("cannot create output directory {}", args.output_dir.display())
    })?;
    let config = pipeline_config(&args);

    info!(
        dataset = %args.dataset.display(),
        endpoint = %args.endpoint,
        workers = config.worker_count(),
        "starting evaluation"
    );
    let summary = evaluate(BufReader::new(reader), &model, &mut sink, &config)?;

    report(&summary, Some(&args.output_dir.join(SUMMARY_FILE)))
}

fn summarize(results: &Path) -> Result<()> {
    let file = File::open(results)
        .with_context(|| format!("cannot open results file {}", results.display()))?;
    let summary = summarize_results(BufReader::new(file))?;
    report(&summary, None)
}

fn pipeline_config(args: &RunArgs) -> PipelineConfig {
    PipelineConfig::default()
        .with_worker_count(args.workers)
        .with_batch_size(args.batch_size)
        .with_n_shot(args.n_shot)
        .with_expected_total(args.expected_total)
        .with_progress_interval(Duration::from_secs(args.progress_secs))
        .with_activity_name(args.activity.clone())
}

fn report(summary: &RunSummary, path: Option<&Path>) -> Result<()> {
    let text = summary.to_string();
    print!("{text}");
    if let Some(path) = path {
        std::fs::write(path, &text)
            .with_context(|| format!("cannot write report {}", path.display()))?;
        info!("accuracy report saved to {}", path.display());
    }
    Ok(())
}
