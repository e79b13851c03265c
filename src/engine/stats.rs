//! Run-wide counters shared by all workers.

use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use crate::domain::ScoredResult;

/// Lock-free counters, updated by every worker with one atomic add per counter.
///
/// The counters are not updated as a unit, so a snapshot may see `total` already incremented for an item
/// whose `correct`/`invalid` increment is not visible yet. It never sees the opposite.
#[derive(Debug, Default)]
pub(crate) struct RunStats {
    total: AtomicU64,
    correct: AtomicU64,
    invalid: AtomicU64,
    processing_nanos: AtomicU64,
}

impl RunStats {
    pub(crate) fn record(&self, result: &ScoredResult, elapsed: Duration) {
        // total first, see snapshot()
        self.total.fetch_add(1, Ordering::SeqCst);
        if result.is_correct {
            self.correct.fetch_add(1, Ordering::SeqCst);
        }
        if result.is_invalid {
            self.invalid.fetch_add(1, Ordering::SeqCst);
        }
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.processing_nanos.fetch_add(nanos, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> StatsSnapshot {
        let correct = self.correct.load(Ordering::SeqCst);
        let invalid = self.invalid.load(Ordering::SeqCst);
        let total = self.total.load(Ordering::SeqCst);
        let processing_time = Duration::from_nanos(self.processing_nanos.load(Ordering::Relaxed));
        StatsSnapshot {
            total,
            correct,
            invalid,
            processing_time,
        }
    }
}

/// Plain copy of the counters at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct StatsSnapshot {
    pub(crate) total: u64,
    pub(crate) correct: u64,
    pub(crate) invalid: u64,
    /// Sum of the processing times of all items, not wall time
    pub(crate) processing_time: Duration,
}

impl StatsSnapshot {
    pub(crate) fn accuracy(&self) -> f64 {
        percentage(self.correct, self.total)
    }

    /// Mean seconds spent per item, unknown before the first one completes.
    pub(crate) fn average_seconds(&self) -> Option<f64> {
        (self.total > 0).then(|| self.processing_time.as_secs_f64() / self.total as f64)
    }

    /// Seconds needed for the items left until `expected_total`, at the average pace so far.
    ///
    /// Goes negative once more than `expected_total` items were processed.
    pub(crate) fn eta_seconds(&self, expected_total: u64) -> Option<f64> {
        let average = self.average_seconds()?;
        let remaining = expected_total as f64 - self.total as f64;
        Some(remaining * average)
    }
}

/// `part / whole` as a percentage, 0 for an empty `whole`.
pub(crate) fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
