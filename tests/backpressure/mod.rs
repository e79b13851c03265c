//! Tests for the bounded queues throttling the dataset reader.

use std::{
    sync::atomic::{AtomicUsize, Ordering},
    thread,
    time::Duration,
};

use choice_eval_rs::{
    Error, InferenceRequest, MemorySink, PipelineConfig, ProgressSnapshot, Record, ResultSink,
    ScoredResult, run_pipeline,
};
use crossbeam_channel::bounded;

fn record(i: usize) -> Record {
    Record::new(format!("premise {i}"), "a", "b", "effect", "0").unwrap()
}

#[test]
fn reader_stays_within_the_intake_capacity_of_stalled_workers() {
    const WORKERS: usize = 2;
    const INTAKE: usize = 3;
    const RECORDS: usize = 100;

    let pulled = AtomicUsize::new(0);
    let (release_tx, release_rx) = bounded::<()>(0);
    // Blocks every call until the test drops `release_tx`
    let model = |_: &InferenceRequest| -> Result<String, Error> {
        let _ = release_rx.recv();
        Ok("A".to_string())
    };
    let config = PipelineConfig::default()
        .with_worker_count(WORKERS)
        .with_intake_capacity(INTAKE)
        .with_batch_size(10)
        .with_progress_interval(Duration::from_secs(3600));
    let records = (0..RECORDS).map(|i| {
        pulled.fetch_add(1, Ordering::SeqCst);
        record(i)
    });

    let mut sink = MemorySink::default();
    let summary = thread::scope(|s| {
        let pipeline = s.spawn(|| run_pipeline(records, &model, &mut sink, &config));

        thread::sleep(Duration::from_millis(300));
        let ahead = pulled.load(Ordering::SeqCst);
        // one record held by each worker, a full queue, and one waiting in the reader's send
        assert!(
            ahead <= WORKERS + INTAKE + 1,
            "reader pulled {ahead} records while the workers were stalled"
        );
        assert!(ahead >= WORKERS, "workers never received a record");

        drop(release_tx);
        pipeline.join().expect("pipeline does not panic")
    });

    assert_eq!(summary.total, RECORDS as u64);
    assert_eq!(pulled.load(Ordering::SeqCst), RECORDS);
    assert_eq!(sink.results().count(), RECORDS);
}

#[test]
fn slow_sink_throttles_but_loses_nothing() {
    struct SlowSink(MemorySink);

    impl ResultSink for SlowSink {
        fn write_results(&mut self, batch: &[ScoredResult]) -> Result<(), Error> {
            thread::sleep(Duration::from_millis(20));
            self.0.write_results(batch)
        }

        fn write_progress(&mut self, snapshot: &ProgressSnapshot) -> Result<(), Error> {
            self.0.write_progress(snapshot)
        }
    }

    let model = |_: &InferenceRequest| -> Result<String, Error> { Ok("A".to_string()) };
    let config = PipelineConfig::default()
        .with_worker_count(8)
        .with_batch_size(1)
        .with_output_capacity(1)
        .with_progress_interval(Duration::from_secs(3600));

    let mut sink = SlowSink(MemorySink::default());
    let summary = run_pipeline((0..30).map(record), &model, &mut sink, &config);

    assert_eq!(summary.total, 30);
    assert_eq!(summary.correct, 30);
    assert_eq!(sink.0.results().count(), 30);
}
