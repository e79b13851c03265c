//! Module focusing on the way the records are orchestrated between the feeder, the workers and the collector

use std::{
    thread::{Scope, ScopedJoinHandle},
    time::Instant,
};

use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::{debug, error, info};

use crate::{
    config::PipelineConfig,
    domain::{PromptBuilder, Record, ScoredResult},
    engine::{RunStats, collector::Collector, worker::run_worker},
    inference::Model,
    output::{ProgressSnapshot, ResultSink, RunSummary},
};

///
/// Evaluates every record with `model` and hands the scored results to `sink`, returning the final counts
/// once all records are processed.
///
/// One feeder thread pushes the records into a bounded intake queue, `worker_count` worker threads score
/// them and a collector thread persists the results in batches, plus a progress snapshot on every tick.
/// Results reach the sink in completion order, not in record order.
///
pub fn run_pipeline<I, M, S>(
    records: I,
    model: &M,
    sink: &mut S,
    config: &PipelineConfig,
) -> RunSummary
where
    I: IntoIterator<Item = Record>,
    I::IntoIter: Send,
    M: Model + ?Sized,
    S: ResultSink + ?Sized,
{
    let started = Instant::now();
    let stats = RunStats::default();
    let prompts = PromptBuilder::new(config.activity_name(), config.n_shot());
    let records = records.into_iter();

    std::thread::scope(|s| {
        let (record_tx, record_rx) = bounded::<Record>(config.intake_capacity());
        let (result_tx, result_rx) = bounded::<ScoredResult>(config.output_capacity());

        let feeder = s.spawn(move || feed(records, record_tx));

        let workers = spawn_workers(
            s,
            record_rx,
            result_tx.clone(),
            model,
            &prompts,
            &stats,
            config.worker_count(),
        );

        let collector = {
            let stats = &stats;
            let sink = &mut *sink;
            s.spawn(move || {
                Collector::new(sink, stats, config.batch_size(), config.expected_total())
                    .run(result_rx, config.progress_interval())
            })
        };

        // --- Completion: workers drain the intake → the results queue closes → the collector flushes ---
        for handle in workers {
            handle.join().expect("worker thread does not panic");
        }
        drop(result_tx);

        collector.join().expect("collector thread does not panic");
        let dispatched = feeder.join().expect("feeder thread does not panic");
        debug!(dispatched, "all records dispatched");
    });

    let stats = stats.snapshot();
    let elapsed = started.elapsed();

    let snapshot = ProgressSnapshot::final_report(&stats, elapsed);
    info!("evaluation completed: {snapshot}");
    if let Err(e) = sink.write_progress(&snapshot) {
        error!("failed to persist final snapshot: {e}");
    }

    RunSummary::from_stats(&stats, elapsed)
}

/// Pushes the records into the intake queue, blocking while it is full. Closes the queue when done.
fn feed(records: impl Iterator<Item = Record>, intake: Sender<Record>) -> u64 {
    let mut dispatched = 0;
    for record in records {
        // Send fails only if every worker is gone; their join surfaces the panic.
        if intake.send(record).is_err() {
            break;
        }
        dispatched += 1;
    }
    dispatched
}

fn spawn_workers<'s, 'e, M: Model + ?Sized>(
    s: &'s Scope<'s, 'e>,
    intake: Receiver<Record>,
    output: Sender<ScoredResult>,
    model: &'e M,
    prompts: &'e PromptBuilder,
    stats: &'e RunStats,
    worker_count: usize,
) -> Vec<ScopedJoinHandle<'s, ()>> {
    (0..worker_count)
        .map(|id| {
            let intake = intake.clone();
            let output = output.clone();
            s.spawn(move || run_worker(id, intake, output, model, prompts, stats))
        })
        .collect()
}
