mod config;
mod domain;
mod engine;
mod error;
mod inference;
mod input;
mod output;
mod telemetry;

use std::io::Read;

pub use config::{
    DEFAULT_ACTIVITY_NAME, DEFAULT_BATCH_SIZE, DEFAULT_EXPECTED_TOTAL, DEFAULT_N_SHOT,
    DEFAULT_PROGRESS_INTERVAL, DEFAULT_WORKER_COUNT, PipelineConfig,
};
pub use domain::{Answer, Choice, INVALID_ANSWER, Record, ScoredResult};
pub use engine::run_pipeline;
pub use error::Error;
pub use inference::{DEFAULT_ENDPOINT, HttpModel, InferenceConfig, InferenceRequest, Model};
pub use input::parse_records;
pub use output::{
    JsonlSink, MemorySink, PROGRESS_FILE, ProgressSnapshot, RESULTS_FILE, ResultSink, RunSummary,
    SnapshotKind, format_duration, summarize_results,
};
pub use telemetry::setup_logging;

/// Evaluates `model` on the multiple-choice dataset read from `reader` and returns the final counts.
///
/// The dataset is a CSV file with at least the columns `premise, choice1, choice2, question, label`. Every
/// record is turned into a prompt, answered by one blocking `model` call, scored, and handed to `sink`
/// in batches, alongside periodic progress snapshots and a final one.
///
/// # Error handling
///
/// Only a dataset that cannot be read at all (unreadable file, missing column) is an error, reported before
/// any model call is made. Everything after that degrades instead of failing:
/// - a malformed row ends the dataset early,
/// - a failed model call makes that record's answer invalid,
/// - a failed sink write is logged and the run continues.
///
/// # Example
///
/// ```no_run
/// use std::fs::File;
/// use choice_eval_rs::{HttpModel, InferenceConfig, JsonlSink, PipelineConfig, evaluate};
///
/// let reader = File::open("planting_a_tree.csv").unwrap();
/// let model = HttpModel::new(InferenceConfig::default()).unwrap();
/// let mut sink = JsonlSink::create("eval-output").unwrap();
///
/// let summary = evaluate(reader, &model, &mut sink, &PipelineConfig::default()).unwrap();
/// print!("{summary}");
/// ```
pub fn evaluate<R, M, S>(
    reader: R,
    model: &M,
    sink: &mut S,
    config: &PipelineConfig,
) -> Result<RunSummary, Error>
where
    R: Read + Send,
    M: Model + ?Sized,
    S: ResultSink + ?Sized,
{
    let records = input::parse_records(reader)?;
    Ok(engine::run_pipeline(records, model, sink, config))
}
