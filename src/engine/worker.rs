//! Per-record transform executed by the worker threads.

use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use rand::Rng;
use tracing::{debug, warn};

use crate::{
    domain::{INVALID_ANSWER, PromptBuilder, Record, ScoredResult},
    engine::RunStats,
    inference::{InferenceRequest, Model},
};

/// Pulls records until the intake queue is closed and drained, publishing one result per record.
///
/// Publishing blocks while the output queue is full, which is what throttles the workers (and through
/// them the intake) when the collector falls behind.
pub(super) fn run_worker<M: Model + ?Sized>(
    id: usize,
    intake: Receiver<Record>,
    output: Sender<ScoredResult>,
    model: &M,
    prompts: &PromptBuilder,
    stats: &RunStats,
) {
    let mut rng = rand::thread_rng();
    let mut processed = 0u64;

    for record in intake {
        let result = process_record(record, model, prompts, stats, &mut rng);
        processed += 1;
        // Send fails only if the collector thread panicked; surfaced when it is joined.
        if output.send(result).is_err() {
            break;
        }
    }

    debug!(worker = id, processed, "worker finished");
}

/// Scores one record. A failing inference call never fails the record: its completion becomes the
/// invalid sentinel instead.
pub(super) fn process_record<M: Model + ?Sized>(
    record: Record,
    model: &M,
    prompts: &PromptBuilder,
    stats: &RunStats,
    rng: &mut impl Rng,
) -> ScoredResult {
    let started = Instant::now();

    let request = InferenceRequest::new(prompts.build(&record, rng));
    let completion = match model.complete(&request) {
        Ok(completion) => completion,
        Err(e) => {
            warn!("inference failed, answer recorded as invalid: {e}");
            INVALID_ANSWER.to_string()
        }
    };

    let elapsed = started.elapsed();
    let result = ScoredResult::score(record, completion, elapsed);
    stats.record(&result, elapsed);

    debug!(
        expected = %result.correct_answer,
        answer = %result.model_answer,
        correct = result.is_correct,
        "scored record"
    );
    result
}
