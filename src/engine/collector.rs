//! The single consumer of scored results.

use std::time::Duration;

use crossbeam_channel::{Receiver, select, tick};
use tracing::{error, info};

use crate::{
    domain::ScoredResult,
    engine::RunStats,
    output::{ProgressSnapshot, ResultSink},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CollectorState {
    Draining,
    /// The output queue is closed and empty, everything received was handed to the sink
    Closed,
}

/// Batches results for the sink and periodically persists a snapshot of the run counters.
///
/// The collector is the only writer to the sink while the workers run. Sink failures are logged and the
/// affected batch or snapshot is dropped; they never stop the run.
pub(super) struct Collector<'a, S: ResultSink + ?Sized> {
    sink: &'a mut S,
    stats: &'a RunStats,
    batch: Vec<ScoredResult>,
    batch_size: usize,
    expected_total: u64,
    state: CollectorState,
}

impl<'a, S: ResultSink + ?Sized> Collector<'a, S> {
    /// `batch_size` must be at least 1, as guaranteed by [`crate::PipelineConfig`].
    pub(super) fn new(
        sink: &'a mut S,
        stats: &'a RunStats,
        batch_size: usize,
        expected_total: u64,
    ) -> Self {
        Self {
            sink,
            stats,
            batch: Vec::with_capacity(batch_size),
            batch_size,
            expected_total,
            state: CollectorState::Draining,
        }
    }

    /// Multiplexes result arrival and the progress timer until the results queue is closed and drained.
    pub(super) fn run(mut self, results: Receiver<ScoredResult>, progress_interval: Duration) {
        let ticker = tick(progress_interval);

        while self.state == CollectorState::Draining {
            select! {
                recv(results) -> msg => match msg {
                    Ok(result) => self.on_result(result),
                    Err(_) => self.finish(),
                },
                recv(ticker) -> _ => self.on_tick(),
            }
        }
    }

    pub(super) fn on_result(&mut self, result: ScoredResult) {
        self.batch.push(result);
        if self.batch.len() >= self.batch_size {
            self.flush();
        }
    }

    pub(super) fn on_tick(&mut self) {
        let snapshot = ProgressSnapshot::periodic(&self.stats.snapshot(), self.expected_total);
        info!("{snapshot}");
        if let Err(e) = self.sink.write_progress(&snapshot) {
            error!("failed to persist progress snapshot: {e}");
        }
    }

    pub(super) fn finish(&mut self) {
        if !self.batch.is_empty() {
            self.flush();
        }
        self.state = CollectorState::Closed;
    }

    #[cfg(test)]
    pub(super) fn state(&self) -> CollectorState {
        self.state
    }

    fn flush(&mut self) {
        if let Err(e) = self.sink.write_results(&self.batch) {
            error!(
                "failed to persist a batch of {} results: {e}",
                self.batch.len()
            );
        }
        self.batch.clear();
    }
}
