//! Module for everything leaving the pipeline: persisted results, progress snapshots and the final report.

mod jsonl;
mod memory;
mod summary;


use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, domain::ScoredResult, engine::StatsSnapshot};

pub use jsonl::{JsonlSink, PROGRESS_FILE, RESULTS_FILE};
pub use memory::MemorySink;
pub use summary::{RunSummary, summarize_results};

/// Destination of the two append-only streams of a run. Written by a single thread at a time and never
/// read back while the run is in progress.
pub trait ResultSink: Send {
    fn write_results(&mut self, batch: &[ScoredResult]) -> Result<(), Error>;

    fn write_progress(&mut self, snapshot: &ProgressSnapshot) -> Result<(), Error>;
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotKind {
    /// Written on every timer tick while results are coming in
    Progress,
    /// Written once after the pipeline drained
    Final,
}

/// Point-in-time view of the run counters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProgressSnapshot {
    pub timestamp: DateTime<Utc>,
    pub kind: SnapshotKind,
    pub total_questions: u64,
    pub correct_num: u64,
    pub invalid_answers: u64,
    /// Percentage of all processed questions answered correctly, 0 before the first one
    pub accuracy: f64,
    /// Estimated seconds left, negative once more items than expected were processed. Unknown before the
    /// first item completes and on the final snapshot.
    pub eta_seconds: Option<f64>,
    /// Wall time of the whole run, set on the final snapshot only
    pub elapsed_seconds: Option<f64>,
}

impl ProgressSnapshot {
    pub(crate) fn periodic(stats: &StatsSnapshot, expected_total: u64) -> Self {
        Self {
            timestamp: Utc::now(),
            kind: SnapshotKind::Progress,
            total_questions: stats.total,
            correct_num: stats.correct,
            invalid_answers: stats.invalid,
            accuracy: stats.accuracy(),
            eta_seconds: stats.eta_seconds(expected_total),
            elapsed_seconds: None,
        }
    }

    pub(crate) fn final_report(stats: &StatsSnapshot, elapsed: Duration) -> Self {
        Self {
            timestamp: Utc::now(),
            kind: SnapshotKind::Final,
            total_questions: stats.total,
            correct_num: stats.correct,
            invalid_answers: stats.invalid,
            accuracy: stats.accuracy(),
            eta_seconds: None,
            elapsed_seconds: Some(elapsed.as_secs_f64()),
        }
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed: {}, Correct: {}, Accuracy: {:.2}%, Invalid: {}",
            self.total_questions, self.correct_num, self.accuracy, self.invalid_answers
        )?;
        match (self.kind, self.eta_seconds, self.elapsed_seconds) {
            (SnapshotKind::Final, _, Some(elapsed)) => {
                write!(f, ", Total time: {}", format_duration(elapsed))
            }
            (_, Some(eta), _) => write!(f, ", ETA: {}", format_duration(eta)),
            _ => write!(f, ", ETA: unknown"),
        }
    }
}

/// Renders seconds as `1h 2m 3s`, dropping the hours when there are none. Fractions are truncated.
pub fn format_duration(seconds: f64) -> String {
    let sign = if seconds < 0.0 { "-" } else { "" };
    let whole = seconds.abs().trunc() as u64;
    let (hours, minutes, secs) = (whole / 3600, whole % 3600 / 60, whole % 60);
    if hours > 0 {
        format!("{sign}{hours}h {minutes}m {secs}s")
    } else {
        format!("{sign}{minutes}m {secs}s")
    }
}
